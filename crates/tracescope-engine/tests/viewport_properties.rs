use std::sync::Arc;

use tracescope_engine::{build_items, Item, RowSizing, Viewport, ViewportConfig};
use tracescope_testing::fixtures::{EventBuilder, thread_runs};
use tracescope_types::Event;

fn viewport(height: u32, threshold: u32) -> Viewport {
    let mut viewport = Viewport::new(
        RowSizing::default(),
        ViewportConfig {
            overscan: 2,
            autoscroll_threshold: threshold,
        },
    );
    viewport.set_viewport_height(height);
    viewport
}

fn log(count: usize) -> Arc<[Event]> {
    thread_runs(&[(1, count)]).into()
}

#[test]
fn test_every_thread_run_starts_with_one_heading() {
    let layouts: &[&[(u64, usize)]] = &[
        &[(1, 1)],
        &[(1, 3), (2, 1), (1, 2)],
        &[(7, 1), (8, 1), (9, 1), (8, 4)],
        &[(0, 5)],
    ];

    for layout in layouts {
        let events = thread_runs(layout);
        let items = build_items(&events);

        let headings = items.iter().filter(|item| item.is_heading()).count();
        assert_eq!(headings, layout.len(), "layout {:?}", layout);
        assert!(items[0].is_heading());

        for (position, item) in items.iter().enumerate() {
            let Item::Event { source_index, event } = item else {
                continue;
            };
            let starts_run =
                *source_index == 0 || events[source_index - 1].thread_id != event.thread_id;
            assert_eq!(
                items[position - 1].is_heading(),
                starts_run,
                "event {} in layout {:?}",
                source_index,
                layout
            );
        }
    }
}

#[test]
fn test_appended_event_becomes_last_visible_while_tailing() {
    let mut viewport = viewport(6, 1);
    viewport.set_events(log(20));

    for count in 21..30 {
        viewport.set_events(log(count));
        let window = viewport.window();
        let last_row = viewport.items().len() - 1;
        assert_eq!(window.last_visible_row(), Some(last_row));
    }
}

#[test]
fn test_threshold_toggles_tailing() {
    let mut viewport = viewport(10, 2);
    viewport.set_events(log(99));
    // 100 rows, bottom offset 90, tailing tolerated down to 88
    assert!(viewport.autoscroll().enabled());

    assert!(!viewport.scroll_to(87));
    assert!(!viewport.autoscroll().enabled());

    assert!(viewport.scroll_to(88));
    assert!(viewport.autoscroll().enabled());
}

#[test]
fn test_paused_tail_resumes_after_scrolling_to_bottom() {
    let mut viewport = viewport(5, 1);
    viewport.set_events(log(40));

    viewport.scroll_by(-20);
    viewport.set_events(log(45));
    let paused_offset = viewport.scroll_offset();
    assert!(viewport.window().last_visible_row() < Some(viewport.items().len() - 1));

    viewport.scroll_to_bottom();
    viewport.set_events(log(50));

    assert!(viewport.scroll_offset() > paused_offset);
    assert_eq!(
        viewport.window().last_visible_row(),
        Some(viewport.items().len() - 1)
    );
}

#[test]
fn test_selection_change_remeasures_following_rows() {
    let mut viewport = viewport(50, 1);
    let events: Arc<[Event]> = vec![
        EventBuilder::new(1, "a").backtrace(&[1, 2, 3, 4]).build(),
        EventBuilder::new(1, "b\nsecond line").build(),
        EventBuilder::new(1, "c").build(),
    ]
    .into();
    viewport.set_events(events);

    let tops = |viewport: &mut Viewport| -> Vec<u32> {
        viewport.window().rows.iter().map(|row| row.top).collect()
    };

    // heading 1, a 1, b 2 + padding 1, c 1
    assert_eq!(tops(&mut viewport), vec![0, 1, 2, 5]);

    viewport.activate(0).unwrap();
    // a: 1 + detail 2 + 3 extra frames
    assert_eq!(tops(&mut viewport), vec![0, 1, 7, 10]);

    viewport.activate(1).unwrap();
    assert_eq!(tops(&mut viewport), vec![0, 1, 2, 7]);
}
