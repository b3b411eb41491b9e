// ABOUTME: Section-aware slide navigation
// ABOUTME: Slide index, grouped header rendering and navigation state sync

pub mod header;
pub mod index;
pub mod sync;

pub use header::{
    render_header, ClickTarget, CounterElement, HeaderContainer, HtmlCounter, HtmlHeader,
    NavTarget, RenderContext, BINDING_SCRIPT,
};
pub use index::{SectionGroup, SlideElement, SlideIndex, SlideRecord, UNTITLED_SECTION};
pub use sync::{DeckEvent, HeaderSync, Navigator};
