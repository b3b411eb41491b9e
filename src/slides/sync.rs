// ABOUTME: Keeps the slide header in step with the presentation
// ABOUTME: Handles ready, slide-changed and header click events

use crate::slides::header::{
    dispatch_click, render_header, ClickTarget, CounterElement, HeaderContainer, RenderContext,
};
use crate::slides::index::{SlideElement, SlideIndex};
use log::{debug, info};

/// The slide library as seen by the header code.
pub trait Navigator {
    /// Current horizontal slide index.
    fn current_index(&self) -> usize;
    fn total_slides(&self) -> usize;
    /// Navigate to a slide by index.
    fn go_to(&mut self, index: usize);
}

/// Events delivered by the slide library or the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckEvent {
    Ready,
    SlideChanged,
    Click(ClickTarget),
}

/// Header state for one page session.
///
/// The index is empty until [`HeaderSync::on_ready`] runs; every later
/// handler only reads it.
pub struct HeaderSync<H, C> {
    index: SlideIndex,
    ctx: RenderContext<H, C>,
}

impl<H: HeaderContainer, C: CounterElement> HeaderSync<H, C> {
    pub fn new(ctx: RenderContext<H, C>) -> Self {
        Self {
            index: SlideIndex::default(),
            ctx,
        }
    }

    pub fn index(&self) -> &SlideIndex {
        &self.index
    }

    pub fn context(&self) -> &RenderContext<H, C> {
        &self.ctx
    }

    /// Index the slides, render the header once and mark the current slide.
    pub fn on_ready<E: SlideElement, N: Navigator>(&mut self, slides: &[E], nav: &N) {
        self.index = SlideIndex::from_slides(slides);
        info!("Deck ready with {} slides", self.index.len());
        render_header(&self.index, &mut self.ctx);
        self.on_slide_changed(nav);
    }

    /// Move the active markers and the counter to the library's current slide.
    pub fn on_slide_changed<N: Navigator>(&mut self, nav: &N) {
        let current = nav.current_index();
        let Some(record) = self.index.get(current) else {
            debug!("Slide {} is not indexed, leaving header untouched", current);
            return;
        };

        if let Some(counter) = self.ctx.counter.as_mut() {
            counter.set_text(&format!("{} / {}", current + 1, nav.total_slides()));
        }

        if let Some(header) = self.ctx.header.as_mut() {
            header.clear_active();
            header.set_group_active(record.section());
            header.set_dot_active(record.index());
        }
    }

    pub fn on_click<N: Navigator>(&self, target: &ClickTarget, nav: &mut N) {
        dispatch_click(&self.index, target, nav);
    }

    /// Run the handler for one event to completion.
    pub fn handle<E: SlideElement, N: Navigator>(
        &mut self,
        event: &DeckEvent,
        slides: &[E],
        nav: &mut N,
    ) {
        match event {
            DeckEvent::Ready => self.on_ready(slides, nav),
            DeckEvent::SlideChanged => self.on_slide_changed(nav),
            DeckEvent::Click(target) => self.on_click(target, nav),
        }
    }
}
