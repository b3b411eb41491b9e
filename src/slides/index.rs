// ABOUTME: Slide index for section-aware navigation
// ABOUTME: Tags every slide with the nearest preceding section label and groups them

use log::debug;

/// Section title used for slides that precede the first section label.
pub const UNTITLED_SECTION: &str = "Untitled";

/// Anything that can stand in for a rendered slide element.
pub trait SlideElement {
    /// The section label declared on this slide, if any.
    fn section_label(&self) -> Option<&str>;
}

impl SlideElement for Option<String> {
    fn section_label(&self) -> Option<&str> {
        self.as_deref()
    }
}

impl SlideElement for Option<&str> {
    fn section_label(&self) -> Option<&str> {
        *self
    }
}

/// One slide at its horizontal position in the deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideRecord {
    index: usize,
    section: String,
}

impl SlideRecord {
    /// Zero-based position of the slide.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Title of the section the slide belongs to.
    pub fn section(&self) -> &str {
        &self.section
    }
}

/// Slides sharing a section title, in deck order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionGroup {
    pub title: String,
    pub slides: Vec<usize>,
}

impl SectionGroup {
    /// The slide a click on the group header jumps to.
    pub fn first_slide(&self) -> Option<usize> {
        self.slides.first().copied()
    }
}

/// Ordered slide records for one presentation.
///
/// Built once after the deck is loaded and read-only afterwards. Owners hand
/// it to the header renderer and the navigation updater explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideIndex {
    records: Vec<SlideRecord>,
}

impl SlideIndex {
    /// Build the index from one optional section label per slide, in
    /// document order.
    pub fn build<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let mut current = UNTITLED_SECTION.to_string();
        let mut records = Vec::new();

        for (index, label) in labels.into_iter().enumerate() {
            if let Some(label) = label {
                let label = label.as_ref().trim();
                if !label.is_empty() {
                    current = label.to_string();
                }
            }
            records.push(SlideRecord {
                index,
                section: current.clone(),
            });
        }

        debug!("Indexed {} slides", records.len());
        Self { records }
    }

    /// Build the index from slide elements.
    pub fn from_slides<E: SlideElement>(slides: &[E]) -> Self {
        Self::build(slides.iter().map(|s| s.section_label()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SlideRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlideRecord> {
        self.records.iter()
    }

    /// Group slides by section title in first-seen order.
    ///
    /// A title that reappears after another section is folded into the group
    /// where it was first seen.
    pub fn groups(&self) -> Vec<SectionGroup> {
        let mut groups: Vec<SectionGroup> = Vec::new();

        for record in &self.records {
            match groups.iter_mut().find(|g| g.title == record.section) {
                Some(group) => group.slides.push(record.index),
                None => groups.push(SectionGroup {
                    title: record.section.clone(),
                    slides: vec![record.index],
                }),
            }
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections(index: &SlideIndex) -> Vec<&str> {
        index.iter().map(|r| r.section()).collect()
    }

    #[test]
    fn test_labels_carry_forward() {
        let index = SlideIndex::build(vec![None, Some("Intro"), None, Some("Details"), None]);

        assert_eq!(
            sections(&index),
            vec!["Untitled", "Intro", "Intro", "Details", "Details"]
        );
        let positions: Vec<usize> = index.iter().map(|r| r.index()).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let index = SlideIndex::build(vec![None, Some("Intro"), None, Some("Details"), None]);
        let groups = index.groups();

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].title, "Untitled");
        assert_eq!(groups[0].slides, vec![0]);
        assert_eq!(groups[1].title, "Intro");
        assert_eq!(groups[1].slides, vec![1, 2]);
        assert_eq!(groups[2].title, "Details");
        assert_eq!(groups[2].slides, vec![3, 4]);
    }

    #[test]
    fn test_empty_and_blank_labels() {
        let empty: Vec<Option<&str>> = Vec::new();
        assert!(SlideIndex::build(empty).is_empty());

        let index = SlideIndex::build(vec![Some("A"), Some("   "), Some("")]);
        assert_eq!(sections(&index), vec!["A", "A", "A"]);
    }

    #[test]
    fn test_repeated_label_merges_into_first_group() {
        let index = SlideIndex::build(vec![Some("A"), Some("B"), Some("A")]);
        let groups = index.groups();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].slides, vec![0, 2]);
        assert_eq!(groups[0].first_slide(), Some(0));
        assert_eq!(groups[1].slides, vec![1]);
    }

    #[test]
    fn test_from_slide_elements() {
        let slides = vec![Some("Intro".to_string()), None];
        let index = SlideIndex::from_slides(&slides);
        assert_eq!(index.get(1).map(|r| r.section()), Some("Intro"));
        assert!(index.get(2).is_none());
    }
}
