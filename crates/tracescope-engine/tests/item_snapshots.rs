use tracescope_engine::{build_items, Item};
use tracescope_testing::fixtures::EventBuilder;

fn describe(items: &[Item<'_>]) -> String {
    items
        .iter()
        .map(|item| match item {
            Item::ThreadHeading {
                source_index,
                thread_id,
                style,
            } => {
                let style: Vec<&str> = style.iter().map(|token| token.as_str()).collect();
                format!(
                    "heading source={} thread={} style=[{}]",
                    source_index,
                    thread_id,
                    style.join(",")
                )
            }
            Item::Event {
                source_index,
                event,
            } => format!(
                "event   source={} thread={} depth={} {:?}",
                source_index, event.thread_id, event.depth, event.message
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_two_thread_scenario() {
    let events = vec![
        EventBuilder::new(1, "a").style(&["cyan"]).build(),
        EventBuilder::new(1, "b").style(&["cyan"]).build(),
        EventBuilder::new(2, "c").style(&["magenta"]).build(),
    ];

    let text = describe(&build_items(&events));
    insta::assert_snapshot!("two_thread_scenario", text);
}

#[test]
fn test_interleaved_threads_with_nesting() {
    let events = vec![
        EventBuilder::new(10, "open(\"/etc/hosts\")").build(),
        EventBuilder::new(10, "read(3)").depth(1).build(),
        EventBuilder::new(11, "write(1)").build(),
        EventBuilder::new(10, "close(3)").depth(1).build(),
        EventBuilder::new(10, "| done").depth(2).build(),
    ];

    let text = describe(&build_items(&events));
    insta::assert_snapshot!("interleaved_threads", text);
}
