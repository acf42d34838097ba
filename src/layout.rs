// ABOUTME: Layout selection for generated slides
// ABOUTME: Maps bullet count, title keywords and content length to a layout kind

use crate::models::LayoutKind;

const IMAGE_KEYWORDS: [&str; 6] = ["visual", "diagram", "chart", "picture", "image", "photo"];
const COMPARISON_KEYWORDS: [&str; 3] = ["comparison", "versus", "vs"];

/// Content longer than this (in characters) gets the text-heavy layout
pub const LONG_CONTENT_CHARS: usize = 500;

/// Pick a layout for a slide. First matching rule wins:
///
/// 1. few bullets and a visual title -> `ImageFocus`
/// 2. five or more bullets -> `TextFocus`
/// 3. comparison keywords in the title -> `Comparison`
/// 4. long section content -> `TextFocus`
/// 5. otherwise `Balanced`
pub fn classify(bullet_count: usize, title: &str, content_length: usize) -> LayoutKind {
    let title_lower = title.to_lowercase();
    let has_keyword = |keywords: &[&str]| keywords.iter().any(|k| title_lower.contains(k));

    if bullet_count <= 2 && has_keyword(&IMAGE_KEYWORDS) {
        LayoutKind::ImageFocus
    } else if bullet_count >= 5 {
        LayoutKind::TextFocus
    } else if has_keyword(&COMPARISON_KEYWORDS) {
        LayoutKind::Comparison
    } else if content_length > LONG_CONTENT_CHARS {
        LayoutKind::TextFocus
    } else {
        LayoutKind::Balanced
    }
}
