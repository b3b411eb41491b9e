// ABOUTME: Grouped slide header rendering
// ABOUTME: Builds one group per section with one dot per slide, plus click targets

use crate::slides::index::SlideIndex;
use crate::slides::sync::Navigator;
use log::{debug, info};
use quick_xml::escape::escape;

/// Element id of the header container in generated decks.
pub const HEADER_ID: &str = "slide-header";

/// Element id of the "current / total" counter in generated decks.
pub const COUNTER_ID: &str = "slide-counter";

/// Page script that keeps the pre-rendered header and counter in step with
/// reveal.js: it marks the current group and dot on `ready` and
/// `slidechanged`, and turns header clicks into `Reveal.slide(n)` calls.
pub const BINDING_SCRIPT: &str = r#"(function () {
  var header = document.getElementById('slide-header');
  var counter = document.getElementById('slide-counter');
  if (!window.Reveal) { return; }

  function slides() {
    return document.querySelectorAll('.reveal .slides > section');
  }

  function update() {
    var all = slides();
    var current = Reveal.getIndices().h;
    if (!all[current]) { return; }
    if (counter) { counter.textContent = (current + 1) + ' / ' + all.length; }
    if (!header) { return; }
    var title = all[current].getAttribute('data-section');
    header.querySelectorAll('.section-group.active, .dot.active').forEach(function (el) {
      el.classList.remove('active');
    });
    header.querySelectorAll('.section-group').forEach(function (group) {
      if (group.getAttribute('data-section') === title) { group.classList.add('active'); }
    });
    var dot = header.querySelector('.dot[data-slide="' + current + '"]');
    if (dot) { dot.classList.add('active'); }
  }

  if (header) {
    header.addEventListener('click', function (event) {
      var dot = event.target.closest('.dot');
      var group = event.target.closest('.section-group');
      if (dot) {
        event.stopPropagation();
        Reveal.slide(parseInt(dot.getAttribute('data-slide'), 10));
      } else if (group) {
        Reveal.slide(parseInt(group.getAttribute('data-target'), 10));
      }
    });
  }

  Reveal.on('ready', update);
  Reveal.on('slidechanged', update);
  if (Reveal.isReady && Reveal.isReady()) { update(); }
})();
"#;

/// Navigation requested by a click on a header element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavTarget(pub usize);

/// What was clicked in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    /// A section group header, identified by its title.
    Group(String),
    /// The dot of one slide.
    Dot(usize),
}

/// One per-slide dot inside a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotView {
    pub index: usize,
    pub on_click: NavTarget,
    pub active: bool,
}

/// One section entry in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub title: String,
    pub on_click: NavTarget,
    pub dots: Vec<DotView>,
    pub active: bool,
}

/// The header region of the page.
pub trait HeaderContainer {
    /// Remove every group.
    fn clear(&mut self);
    fn append_group(&mut self, group: GroupView);
    /// Drop the active marker from every group and dot.
    fn clear_active(&mut self);
    fn set_group_active(&mut self, title: &str);
    fn set_dot_active(&mut self, index: usize);
}

/// The textual "current / total" counter.
pub trait CounterElement {
    fn set_text(&mut self, text: &str);
}

/// References to the page regions the header code writes to.
///
/// Either target may be missing; writes to a missing target are skipped.
pub struct RenderContext<H, C> {
    pub header: Option<H>,
    pub counter: Option<C>,
}

impl<H, C> RenderContext<H, C> {
    pub fn new(header: Option<H>, counter: Option<C>) -> Self {
        Self { header, counter }
    }
}

/// Build the group views for an index, without touching any page.
pub fn group_views(index: &SlideIndex) -> Vec<GroupView> {
    index
        .groups()
        .into_iter()
        .filter_map(|group| {
            let first = group.first_slide()?;
            let dots = group
                .slides
                .iter()
                .map(|&i| DotView {
                    index: i,
                    on_click: NavTarget(i),
                    active: false,
                })
                .collect();
            Some(GroupView {
                title: group.title,
                on_click: NavTarget(first),
                dots,
                active: false,
            })
        })
        .collect()
}

/// Clear the header and rebuild it from the index.
pub fn render_header<H: HeaderContainer, C>(index: &SlideIndex, ctx: &mut RenderContext<H, C>) {
    let Some(header) = ctx.header.as_mut() else {
        debug!("No header container, skipping header render");
        return;
    };

    header.clear();
    let groups = group_views(index);
    info!(
        "Rendering header with {} sections for {} slides",
        groups.len(),
        index.len()
    );
    for group in groups {
        header.append_group(group);
    }
}

/// Resolve a click to the slide it navigates to.
pub fn resolve_click(index: &SlideIndex, target: &ClickTarget) -> Option<NavTarget> {
    match target {
        ClickTarget::Dot(i) => index.get(*i).map(|r| NavTarget(r.index())),
        ClickTarget::Group(title) => index
            .iter()
            .find(|r| r.section() == title)
            .map(|r| NavTarget(r.index())),
    }
}

/// Forward a click to the slide library. Unknown targets are ignored.
pub fn dispatch_click<N: Navigator>(index: &SlideIndex, target: &ClickTarget, nav: &mut N) {
    if let Some(NavTarget(slide)) = resolve_click(index, target) {
        debug!("Header click {:?} -> slide {}", target, slide);
        nav.go_to(slide);
    }
}

/// In-memory header that serializes to static markup.
#[derive(Debug, Clone, Default)]
pub struct HtmlHeader {
    groups: Vec<GroupView>,
}

impl HtmlHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[GroupView] {
        &self.groups
    }

    pub fn active_groups(&self) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|g| g.active)
            .map(|g| g.title.as_str())
            .collect()
    }

    pub fn active_dots(&self) -> Vec<usize> {
        self.groups
            .iter()
            .flat_map(|g| g.dots.iter())
            .filter(|d| d.active)
            .map(|d| d.index)
            .collect()
    }

    pub fn to_html(&self) -> String {
        let mut html = format!("<nav id=\"{}\" class=\"slide-header\">\n", HEADER_ID);
        for group in &self.groups {
            let class = if group.active {
                "section-group active"
            } else {
                "section-group"
            };
            html.push_str(&format!(
                "<div class=\"{}\" data-section=\"{}\" data-target=\"{}\">",
                class,
                escape(group.title.as_str()),
                group.on_click.0
            ));
            html.push_str(&format!(
                "<span class=\"section-title\">{}</span><span class=\"section-dots\">",
                escape(group.title.as_str())
            ));
            for dot in &group.dots {
                let class = if dot.active { "dot active" } else { "dot" };
                html.push_str(&format!(
                    "<span class=\"{}\" data-slide=\"{}\"></span>",
                    class, dot.on_click.0
                ));
            }
            html.push_str("</span></div>\n");
        }
        html.push_str("</nav>");
        html
    }
}

impl HeaderContainer for HtmlHeader {
    fn clear(&mut self) {
        self.groups.clear();
    }

    fn append_group(&mut self, group: GroupView) {
        self.groups.push(group);
    }

    fn clear_active(&mut self) {
        for group in &mut self.groups {
            group.active = false;
            for dot in &mut group.dots {
                dot.active = false;
            }
        }
    }

    fn set_group_active(&mut self, title: &str) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.title == title) {
            group.active = true;
        }
    }

    fn set_dot_active(&mut self, index: usize) {
        if let Some(dot) = self
            .groups
            .iter_mut()
            .flat_map(|g| g.dots.iter_mut())
            .find(|d| d.index == index)
        {
            dot.active = true;
        }
    }
}

/// In-memory counter element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlCounter {
    text: String,
}

impl HtmlCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn to_html(&self) -> String {
        format!(
            "<div id=\"{}\" class=\"slide-counter\">{}</div>",
            COUNTER_ID,
            escape(self.text.as_str())
        )
    }
}

impl CounterElement for HtmlCounter {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_script_uses_page_ids() {
        assert!(BINDING_SCRIPT.contains(&format!("getElementById('{}')", HEADER_ID)));
        assert!(BINDING_SCRIPT.contains(&format!("getElementById('{}')", COUNTER_ID)));
        assert!(BINDING_SCRIPT.contains("data-target"));
        assert!(BINDING_SCRIPT.contains("data-slide"));
        assert!(!BINDING_SCRIPT.contains("</script"));
    }

    fn sample_index() -> SlideIndex {
        SlideIndex::build(vec![None, Some("Intro"), None, Some("Details"), None])
    }

    #[test]
    fn test_render_header_builds_groups_and_dots() {
        let index = sample_index();
        let mut ctx = RenderContext::new(Some(HtmlHeader::new()), Some(HtmlCounter::new()));
        render_header(&index, &mut ctx);

        let header = ctx.header.as_ref().unwrap();
        let titles: Vec<&str> = header.groups().iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Untitled", "Intro", "Details"]);

        let dot_counts: Vec<usize> = header.groups().iter().map(|g| g.dots.len()).collect();
        assert_eq!(dot_counts, vec![1, 2, 2]);
        assert_eq!(header.groups()[2].on_click, NavTarget(3));
    }

    #[test]
    fn test_render_header_replaces_previous_content() {
        let index = sample_index();
        let mut ctx: RenderContext<HtmlHeader, HtmlCounter> =
            RenderContext::new(Some(HtmlHeader::new()), None);
        render_header(&index, &mut ctx);
        render_header(&index, &mut ctx);

        assert_eq!(ctx.header.as_ref().unwrap().groups().len(), 3);
    }

    #[test]
    fn test_render_without_header_is_skipped() {
        let index = sample_index();
        let mut ctx: RenderContext<HtmlHeader, HtmlCounter> = RenderContext::new(None, None);
        render_header(&index, &mut ctx);
        assert!(ctx.header.is_none());
    }

    #[test]
    fn test_resolve_click_targets() {
        let index = sample_index();
        assert_eq!(
            resolve_click(&index, &ClickTarget::Dot(4)),
            Some(NavTarget(4))
        );
        assert_eq!(
            resolve_click(&index, &ClickTarget::Group("Details".to_string())),
            Some(NavTarget(3))
        );
        assert_eq!(resolve_click(&index, &ClickTarget::Dot(9)), None);
        assert_eq!(
            resolve_click(&index, &ClickTarget::Group("Missing".to_string())),
            None
        );
    }

    #[test]
    fn test_header_markup_escapes_titles() {
        let index = SlideIndex::build(vec![Some("Q&A <live>")]);
        let mut ctx: RenderContext<HtmlHeader, HtmlCounter> =
            RenderContext::new(Some(HtmlHeader::new()), None);
        render_header(&index, &mut ctx);

        let html = ctx.header.unwrap().to_html();
        assert!(html.starts_with("<nav id=\"slide-header\""));
        assert!(html.contains("Q&amp;A &lt;live&gt;"));
        assert!(html.contains("<span class=\"dot\" data-slide=\"0\"></span>"));
    }
}
