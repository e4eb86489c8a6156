use crate::models::classify_types::{Prediction, ResultRow, ResultsView};
use std::fmt;

const RANKED_CAPTION: &str = "Top predicted mushroom species";
const EMPTY_CAPTION: &str = "Results will appear here";
const EMPTY_PLACEHOLDER: &str = "Upload an image to see predictions";

pub const DISCLAIMER: &str = "This is an AI model and may not be 100% accurate. \
Never consume mushrooms based solely on this identification.";

/// `0.87` -> `"87.0%"`. Ties round up: `0.8725` -> `"87.3%"`.
pub fn format_confidence(confidence: f64) -> String {
    let tenths = (confidence * 1000.0).round();
    format!("{:.1}%", tenths / 10.0)
}

/// Rows in exactly the order received. Nothing is sorted or filtered.
pub fn render(predictions: &[Prediction]) -> ResultsView {
    if predictions.is_empty() {
        return ResultsView::Empty {
            caption: EMPTY_CAPTION.to_string(),
            placeholder: EMPTY_PLACEHOLDER.to_string(),
        };
    }

    let rows = predictions
        .iter()
        .enumerate()
        .map(|(i, p)| ResultRow {
            rank: i + 1,
            label: p.display_name(),
            confidence: format_confidence(p.confidence),
        })
        .collect();

    ResultsView::Ranked {
        caption: RANKED_CAPTION.to_string(),
        rows,
    }
}

impl fmt::Display for ResultsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultsView::Empty { caption, placeholder } => {
                writeln!(f, "{}", caption)?;
                write!(f, "  {}", placeholder)
            }
            ResultsView::Ranked { caption, rows } => {
                write!(f, "{}", caption)?;
                let width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
                for row in rows {
                    write!(
                        f,
                        "\n{:>3}. {:<width$}  {:>6}",
                        row.rank,
                        row.label,
                        row.confidence,
                        width = width
                    )?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(name: &str, confidence: f64) -> Prediction {
        Prediction {
            name: name.to_string(),
            confidence,
        }
    }

    #[test]
    fn empty_list_renders_placeholder() {
        assert_eq!(
            render(&[]),
            ResultsView::Empty {
                caption: "Results will appear here".into(),
                placeholder: "Upload an image to see predictions".into(),
            }
        );
    }

    #[test]
    fn renders_ranked_rows_with_display_labels() {
        let predictions = vec![
            prediction("Amanita_muscaria", 0.87),
            prediction("Boletus_edulis", 0.10),
        ];
        let view = render(&predictions);

        let ResultsView::Ranked { caption, rows } = view else {
            panic!("expected ranked view");
        };
        assert_eq!(caption, "Top predicted mushroom species");
        assert_eq!(
            rows,
            vec![
                ResultRow {
                    rank: 1,
                    label: "Amanita muscaria".into(),
                    confidence: "87.0%".into(),
                },
                ResultRow {
                    rank: 2,
                    label: "Boletus edulis".into(),
                    confidence: "10.0%".into(),
                },
            ]
        );
        // Display only; the stored label keeps its separators.
        assert_eq!(predictions[0].name, "Amanita_muscaria");
    }

    #[test]
    fn keeps_received_order_even_when_not_descending() {
        let view = render(&[prediction("low", 0.01), prediction("high", 0.99)]);
        let ResultsView::Ranked { rows, .. } = view else {
            panic!("expected ranked view");
        };
        assert_eq!(rows[0].label, "low");
        assert_eq!(rows[1].label, "high");
    }

    #[test]
    fn replaces_every_separator() {
        assert_eq!(prediction("a_b_c", 0.0).display_name(), "a b c");
    }

    #[test]
    fn confidence_has_one_decimal() {
        assert_eq!(format_confidence(1.0), "100.0%");
        assert_eq!(format_confidence(0.0), "0.0%");
        assert_eq!(format_confidence(0.12345), "12.3%");
        assert_eq!(format_confidence(0.5), "50.0%");
    }

    #[test]
    fn confidence_halves_round_up() {
        assert_eq!(format_confidence(0.8725), "87.3%");
        assert_eq!(format_confidence(0.0025), "0.3%");
    }

    #[test]
    fn text_rendering_aligns_rows() {
        let view = render(&[
            prediction("Amanita_muscaria", 0.87),
            prediction("Boletus_edulis", 0.10),
        ]);
        assert_eq!(
            view.to_string(),
            "Top predicted mushroom species\n  1. Amanita muscaria   87.0%\n  2. Boletus edulis     10.0%"
        );
    }
}
