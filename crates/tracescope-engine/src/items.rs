use std::sync::Arc;

use tracescope_types::{Event, StyleToken};

/// Display-level element of the event list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item<'a> {
    /// Synthesized marker preceding each run of same-thread events
    ThreadHeading {
        source_index: usize,
        thread_id: u64,
        style: &'a [StyleToken],
    },
    Event {
        source_index: usize,
        event: &'a Event,
    },
}

impl<'a> Item<'a> {
    /// Index of the event this item was derived from
    pub fn source_index(&self) -> usize {
        match self {
            Item::ThreadHeading { source_index, .. } | Item::Event { source_index, .. } => {
                *source_index
            }
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, Item::ThreadHeading { .. })
    }

    pub fn event(&self) -> Option<&'a Event> {
        match self {
            Item::Event { event, .. } => Some(event),
            Item::ThreadHeading { .. } => None,
        }
    }
}

/// Group events into display items, inserting a heading whenever the
/// thread changes relative to the previous event.
pub fn build_items(events: &[Event]) -> Vec<Item<'_>> {
    let mut items = Vec::with_capacity(events.len() + 1);
    let mut last_thread: Option<u64> = None;

    for (index, event) in events.iter().enumerate() {
        if last_thread != Some(event.thread_id) {
            items.push(Item::ThreadHeading {
                source_index: index,
                thread_id: event.thread_id,
                style: &event.style,
            });
            last_thread = Some(event.thread_id);
        }
        items.push(Item::Event {
            source_index: index,
            event,
        });
    }

    items
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Heading(usize),
    Event(usize),
}

/// Item sequence for one snapshot of the event log
///
/// Rows are stored as indices into the shared event slice so the list can
/// outlive the borrow used to build it.
#[derive(Debug, Clone)]
pub struct ItemList {
    events: Arc<[Event]>,
    rows: Vec<Row>,
    row_of_event: Vec<usize>,
}

impl Default for ItemList {
    fn default() -> Self {
        Self::build(Arc::from(Vec::new()))
    }
}

impl ItemList {
    pub fn build(events: Arc<[Event]>) -> Self {
        let mut rows = Vec::with_capacity(events.len() + 1);
        let mut row_of_event = Vec::with_capacity(events.len());

        for item in build_items(&events) {
            match item {
                Item::ThreadHeading { source_index, .. } => rows.push(Row::Heading(source_index)),
                Item::Event { source_index, .. } => {
                    row_of_event.push(rows.len());
                    rows.push(Row::Event(source_index));
                }
            }
        }

        Self {
            events,
            rows,
            row_of_event,
        }
    }

    pub fn events(&self) -> &Arc<[Event]> {
        &self.events
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Number of rows (events plus headings)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn item(&self, row: usize) -> Option<Item<'_>> {
        let item = match *self.rows.get(row)? {
            Row::Heading(index) => {
                let event = &self.events[index];
                Item::ThreadHeading {
                    source_index: index,
                    thread_id: event.thread_id,
                    style: &event.style,
                }
            }
            Row::Event(index) => Item::Event {
                source_index: index,
                event: &self.events[index],
            },
        };
        Some(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = Item<'_>> + '_ {
        (0..self.rows.len()).filter_map(move |row| self.item(row))
    }

    /// Row holding the given event
    pub fn row_of_event(&self, event_index: usize) -> Option<usize> {
        self.row_of_event.get(event_index).copied()
    }

    /// Event shown on `row`; headings map to the event they introduce.
    pub fn event_at_row(&self, row: usize) -> Option<usize> {
        match *self.rows.get(row)? {
            Row::Heading(index) | Row::Event(index) => Some(index),
        }
    }
}
