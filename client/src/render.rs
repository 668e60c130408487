//! Terminal rendering of the screen state

use shared::{format_average, label_interval, DataError, DisplayBin, ScreenState, SubmissionState};

/// Draws an average diameter and, when available, its histogram
pub trait ChartRenderer {
    fn render(&self, average_diameter: f64, bins: Option<&[DisplayBin]>) -> String;
}

/// Horizontal bar chart drawn with block characters
#[derive(Debug, Clone)]
pub struct TextChart {
    /// Width of the longest bar in characters
    pub bar_width: usize,
}

impl Default for TextChart {
    fn default() -> Self {
        Self { bar_width: 40 }
    }
}

impl ChartRenderer for TextChart {
    fn render(&self, average_diameter: f64, bins: Option<&[DisplayBin]>) -> String {
        let mut out = format!(
            "Average Predicted Width: {} mm\n",
            format_average(average_diameter)
        );

        let bins = match bins {
            Some(bins) if !bins.is_empty() => bins,
            _ => {
                out.push_str(&DataError::EmptyOrInvalidHistogram.to_string());
                out.push('\n');
                return out;
            }
        };

        let interval = label_interval(bins.len());
        let label_width = bins.iter().map(|b| b.width_range.chars().count()).max().unwrap_or(0);
        let peak = bins.iter().map(|b| b.count).fold(0.0_f64, f64::max);

        for (i, bin) in bins.iter().enumerate() {
            let label = if i % interval == 0 { bin.width_range.as_str() } else { "" };
            let length = if peak > 0.0 {
                ((bin.count / peak) * self.bar_width as f64).round() as usize
            } else {
                0
            };
            out.push_str(&format!(
                "{:>width$} | {} {}\n",
                label,
                "█".repeat(length),
                bin.count,
                width = label_width
            ));
        }
        out
    }
}

/// Render the whole screen: message, progress or result
pub fn render_screen<R: ChartRenderer>(renderer: &R, screen: &ScreenState) -> String {
    let mut out = String::new();
    if let Some(message) = screen.error_message() {
        out.push_str(&message);
        out.push('\n');
    }

    match &screen.submission {
        SubmissionState::Validating | SubmissionState::InFlight => out.push_str("Calculating...\n"),
        SubmissionState::Succeeded(result) => {
            out.push_str(&renderer.render(result.average_diameter, Some(&result.bins)))
        }
        SubmissionState::SucceededNoChart { average_diameter } => {
            out.push_str(&renderer.render(*average_diameter, None))
        }
        SubmissionState::Idle | SubmissionState::Failed(_) => {}
    }
    out
}
