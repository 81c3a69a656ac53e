//! Line assembly for engines that return unordered text boxes.
//!
//! Detection+recognition backends emit one box per word or phrase with no
//! line structure. Multi-column receipt layouts then interleave badly if
//! boxes are naively sorted, and every downstream regex that expects
//! `label ... amount` on one line misses. Clustering by vertical center
//! with an adaptive threshold restores the printed lines.

use std::path::Path;

use tracing::debug;

use crate::error::OcrError;

use super::OcrEngine;

/// A recognized text fragment with its position on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub text: String,
    /// Horizontal center in pixels.
    pub x: f32,
    /// Vertical center in pixels.
    pub y: f32,
}

impl TextBox {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }
}

/// Raw detection output: boxes plus the source image dimensions.
#[derive(Debug, Clone)]
pub struct BoxDetection {
    pub boxes: Vec<TextBox>,
    pub image_size: (u32, u32),
}

/// A detection+recognition backend producing positioned text boxes.
pub trait BoxProvider: Send + Sync {
    fn detect(&self, image: &Path) -> Result<BoxDetection, OcrError>;
}

/// Group boxes into lines by vertical center, sort each line
/// left-to-right, and join top-to-bottom.
///
/// The clustering threshold adapts to the image: 2% of its height,
/// clamped to [10, 30] px. Tight enough to keep adjacent receipt lines
/// apart at phone-camera resolutions, loose enough to absorb skew.
pub fn cluster_into_lines(mut boxes: Vec<TextBox>, image_height: u32) -> String {
    if boxes.is_empty() {
        return String::new();
    }

    let threshold = (image_height as f32 * 0.02).clamp(10.0, 30.0);

    boxes.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal));

    let mut lines: Vec<Vec<TextBox>> = Vec::new();
    let mut current: Vec<TextBox> = Vec::new();
    let mut current_y = f32::NEG_INFINITY;

    for text_box in boxes {
        if (text_box.y - current_y).abs() <= threshold {
            current.push(text_box);
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current_y = text_box.y;
            current.push(text_box);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    let mut out = Vec::with_capacity(lines.len());
    for mut line in lines {
        line.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        let joined = line
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        out.push(joined);
    }

    out.join("\n")
}

/// Adapter turning a [`BoxProvider`] into an [`OcrEngine`] via line
/// clustering.
pub struct ClusteredBoxEngine<P> {
    name: String,
    provider: P,
}

impl<P: BoxProvider> ClusteredBoxEngine<P> {
    pub fn new(name: impl Into<String>, provider: P) -> Self {
        Self {
            name: name.into(),
            provider,
        }
    }
}

impl<P: BoxProvider> OcrEngine for ClusteredBoxEngine<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn recognize(&self, image: &Path) -> Option<String> {
        let detection = match self.provider.detect(image) {
            Ok(detection) => detection,
            Err(e) => {
                debug!(engine = %self.name, "detection failed: {e}");
                return None;
            }
        };

        if detection.boxes.is_empty() {
            return None;
        }

        let text = cluster_into_lines(detection.boxes, detection.image_size.1).to_uppercase();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn boxes_on_one_visual_line_join_left_to_right() {
        let boxes = vec![
            TextBox::new("*44,40", 300.0, 902.0),
            TextBox::new("TOPLAM", 50.0, 898.0),
        ];
        assert_eq!(cluster_into_lines(boxes, 1000), "TOPLAM *44,40");
    }

    #[test]
    fn separated_boxes_become_separate_lines() {
        let boxes = vec![
            TextBox::new("TOPLAM *44,40", 50.0, 900.0),
            TextBox::new("TOPKDV *3,29", 50.0, 850.0),
        ];
        assert_eq!(cluster_into_lines(boxes, 1000), "TOPKDV *3,29\nTOPLAM *44,40");
    }

    #[test]
    fn threshold_is_clamped_for_small_and_large_images() {
        // 100px image: 2% = 2px, clamped up to 10px; 8px apart is one line.
        let boxes = vec![
            TextBox::new("A", 0.0, 50.0),
            TextBox::new("B", 10.0, 58.0),
        ];
        assert_eq!(cluster_into_lines(boxes, 100), "A B");

        // 10000px image: 2% = 200px, clamped down to 30px; 40px apart splits.
        let boxes = vec![
            TextBox::new("A", 0.0, 500.0),
            TextBox::new("B", 10.0, 540.0),
        ];
        assert_eq!(cluster_into_lines(boxes, 10_000), "A\nB");
    }

    #[test]
    fn empty_input_yields_empty_text() {
        assert_eq!(cluster_into_lines(Vec::new(), 1000), "");
    }

    struct FixedProvider(Vec<TextBox>);

    impl BoxProvider for FixedProvider {
        fn detect(&self, _image: &Path) -> Result<BoxDetection, OcrError> {
            Ok(BoxDetection {
                boxes: self.0.clone(),
                image_size: (800, 1000),
            })
        }
    }

    #[test]
    fn engine_uppercases_and_orders_output() {
        let engine = ClusteredBoxEngine::new(
            "boxes",
            FixedProvider(vec![
                TextBox::new("toplam", 10.0, 900.0),
                TextBox::new("*44,40", 200.0, 903.0),
                TextBox::new("migros", 10.0, 50.0),
            ]),
        );
        let text = engine.recognize(Path::new("fis.jpg")).unwrap();
        assert_eq!(text, "MIGROS\nTOPLAM *44,40");
    }

    #[test]
    fn engine_reports_empty_detection_as_none() {
        let engine = ClusteredBoxEngine::new("boxes", FixedProvider(Vec::new()));
        assert_eq!(engine.recognize(Path::new("fis.jpg")), None);
    }
}
