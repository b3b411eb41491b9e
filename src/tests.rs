use super::*;
use crate::slides::{ClickTarget, DeckEvent, HtmlCounter, HtmlHeader, RenderContext};

/// Stand-in for the slide library: tracks the current slide and every
/// navigation request.
struct FakeDeck {
    current: usize,
    total: usize,
    requests: Vec<usize>,
}

impl FakeDeck {
    fn new(total: usize) -> Self {
        Self {
            current: 0,
            total,
            requests: Vec::new(),
        }
    }
}

impl Navigator for FakeDeck {
    fn current_index(&self) -> usize {
        self.current
    }

    fn total_slides(&self) -> usize {
        self.total
    }

    fn go_to(&mut self, index: usize) {
        self.requests.push(index);
        self.current = index;
    }
}

fn sample_slides() -> Vec<Option<String>> {
    vec![
        None,
        Some("Intro".to_string()),
        None,
        Some("Details".to_string()),
        None,
    ]
}

fn ready_sync(deck: &FakeDeck) -> HeaderSync<HtmlHeader, HtmlCounter> {
    let mut sync = HeaderSync::new(RenderContext::new(
        Some(HtmlHeader::new()),
        Some(HtmlCounter::new()),
    ));
    sync.on_ready(&sample_slides(), deck);
    sync
}

fn header(sync: &HeaderSync<HtmlHeader, HtmlCounter>) -> &HtmlHeader {
    sync.context().header.as_ref().unwrap()
}

fn counter(sync: &HeaderSync<HtmlHeader, HtmlCounter>) -> &str {
    sync.context().counter.as_ref().unwrap().text()
}

#[test]
fn test_ready_marks_first_slide() {
    let deck = FakeDeck::new(5);
    let sync = ready_sync(&deck);

    assert_eq!(sync.index().len(), 5);
    assert_eq!(counter(&sync), "1 / 5");
    assert_eq!(header(&sync).active_groups(), vec!["Untitled"]);
    assert_eq!(header(&sync).active_dots(), vec![0]);
}

#[test]
fn test_slide_change_moves_markers() {
    let mut deck = FakeDeck::new(5);
    let mut sync = ready_sync(&deck);

    deck.current = 2;
    sync.on_slide_changed(&deck);

    assert_eq!(counter(&sync), "3 / 5");
    assert_eq!(header(&sync).active_groups(), vec!["Intro"]);
    assert_eq!(header(&sync).active_dots(), vec![2]);
}

#[test]
fn test_exactly_one_active_marker_per_slide() {
    let mut deck = FakeDeck::new(5);
    let mut sync = ready_sync(&deck);

    for current in [4, 0, 3, 1, 2] {
        deck.current = current;
        sync.on_slide_changed(&deck);

        let section = sync.index().get(current).unwrap().section().to_string();
        assert_eq!(header(&sync).active_groups(), vec![section.as_str()]);
        assert_eq!(header(&sync).active_dots(), vec![current]);
    }
}

#[test]
fn test_out_of_range_index_leaves_header_untouched() {
    let mut deck = FakeDeck::new(5);
    let mut sync = ready_sync(&deck);

    deck.current = 1;
    sync.on_slide_changed(&deck);
    deck.current = 9;
    sync.on_slide_changed(&deck);

    assert_eq!(counter(&sync), "2 / 5");
    assert_eq!(header(&sync).active_dots(), vec![1]);
}

#[test]
fn test_clicks_navigate_through_the_library() {
    let mut deck = FakeDeck::new(5);
    let sync = ready_sync(&deck);

    sync.on_click(&ClickTarget::Dot(4), &mut deck);
    sync.on_click(&ClickTarget::Group("Intro".to_string()), &mut deck);
    sync.on_click(&ClickTarget::Group("Details".to_string()), &mut deck);
    sync.on_click(&ClickTarget::Dot(42), &mut deck);

    assert_eq!(deck.requests, vec![4, 1, 3]);
}

#[test]
fn test_event_dispatch() {
    let slides = sample_slides();
    let mut deck = FakeDeck::new(5);
    let mut sync: HeaderSync<HtmlHeader, HtmlCounter> = HeaderSync::new(RenderContext::new(
        Some(HtmlHeader::new()),
        Some(HtmlCounter::new()),
    ));

    sync.handle(&DeckEvent::Ready, &slides, &mut deck);
    sync.handle(&DeckEvent::Click(ClickTarget::Dot(3)), &slides, &mut deck);
    sync.handle(&DeckEvent::SlideChanged, &slides, &mut deck);

    assert_eq!(counter(&sync), "4 / 5");
    assert_eq!(header(&sync).active_groups(), vec!["Details"]);
}

#[test]
fn test_missing_targets_are_tolerated() {
    let mut deck = FakeDeck::new(5);
    let mut sync: HeaderSync<HtmlHeader, HtmlCounter> =
        HeaderSync::new(RenderContext::new(None, Some(HtmlCounter::new())));

    sync.on_ready(&sample_slides(), &deck);
    deck.current = 3;
    sync.on_slide_changed(&deck);

    assert!(sync.context().header.is_none());
    assert_eq!(counter(&sync), "4 / 5");
}

#[test]
fn test_empty_deck() {
    let deck = FakeDeck::new(0);
    let mut sync: HeaderSync<HtmlHeader, HtmlCounter> = HeaderSync::new(RenderContext::new(
        Some(HtmlHeader::new()),
        Some(HtmlCounter::new()),
    ));
    let slides: Vec<Option<String>> = Vec::new();
    sync.on_ready(&slides, &deck);

    assert!(sync.index().is_empty());
    assert!(header(&sync).groups().is_empty());
    assert_eq!(counter(&sync), "");
}
