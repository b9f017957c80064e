use std::path::{Path, PathBuf};
use thiserror::Error;
use crate::models::views::DiagnosisView;

/// Instruction prompt sent with every crop image. It pins the response to
/// four fixed-key lines so the answer stays machine parsable.
pub const DETECTION_PROMPT: &str = "\
Analyze this image of a plant.
Is there a disease present?
If yes, what is the disease?
What is the confidence level (a number from 0-100)?
What is the recommended treatment plan?
Respond with exactly these four lines:
Disease: [Name of Disease]
Confidence: [Confidence Level]%
Severity: [Severity Level]
Treatment: [Detailed Treatment Plan]";

#[derive(Error, Debug, PartialEq)]
#[error("diagnosis text carries none of the expected fields: {0}")]
pub struct DiagnosisParseError(pub String);

/// The disease detection flow for one submitted image
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionState {
    Idle,
    ImageSelected(PathBuf),
    Analyzing(PathBuf),
    Result(DiagnosisView),
}

/// Drives a single image through select, analyze and result.
/// The analysis itself runs elsewhere; this only sequences the states and
/// provides the placeholder view shown while the bridge call is pending.
pub struct Detection {
    state: DetectionState,
}

impl Detection {
    pub fn new() -> Detection {
        Detection { state: DetectionState::Idle }
    }

    pub fn state(&self) -> &DetectionState {
        &self.state
    }

    /// An image was picked, any previous analysis is discarded
    ///
    /// # Arguments
    ///
    /// * 'image' - path to the picked image
    pub fn select(&mut self, image: &Path) {
        self.state = DetectionState::ImageSelected(image.to_path_buf());
    }

    /// Submits the selected image and returns the placeholder shown until
    /// the bridge call resolves. Returns None when no image is selected.
    pub fn begin_analysis(&mut self) -> Option<DiagnosisView> {
        let image = match &self.state {
            DetectionState::ImageSelected(image) => image.clone(),
            _ => return None,
        };

        self.state = DetectionState::Analyzing(image);

        Some(DiagnosisView {
            disease: "Analyzing...".to_string(),
            confidence: 0,
            severity: "...".to_string(),
            treatment: "Please wait, AI is analyzing the image.".to_string(),
        })
    }

    /// The bridge call resolved, the placeholder is replaced by the parsed
    /// diagnosis
    ///
    /// # Arguments
    ///
    /// * 'response' - raw text returned by the image bridge
    pub fn finish(&mut self, response: &str) -> Result<DiagnosisView, DiagnosisParseError> {
        let diagnosis = parse_diagnosis(response)?;
        self.state = DetectionState::Result(diagnosis.clone());

        Ok(diagnosis)
    }

    /// Clear & retry, valid from any state
    pub fn clear(&mut self) {
        self.state = DetectionState::Idle;
    }
}

/// Extracts the structured diagnosis fields from a free text response by
/// line prefix matching. Fields not found default to neutral placeholders,
/// but a response containing none of the four prefixes is rejected as a
/// parse error instead of silently defaulting everything.
///
/// # Arguments
///
/// * 'text' - raw text returned by the image bridge
pub fn parse_diagnosis(text: &str) -> Result<DiagnosisView, DiagnosisParseError> {
    let disease = field_after(text, "Disease: ");
    let confidence = field_after(text, "Confidence: ");
    let severity = field_after(text, "Severity: ");
    let treatment = field_after(text, "Treatment: ");

    if disease.is_none() && confidence.is_none() && severity.is_none() && treatment.is_none() {
        return Err(DiagnosisParseError(truncated(text)));
    }

    Ok(DiagnosisView {
        disease: disease.unwrap_or("Unknown".to_string()),
        confidence: confidence.map(|c| leading_number(&c)).unwrap_or(0),
        severity: severity.unwrap_or("N/A".to_string()),
        treatment: treatment.unwrap_or("No specific treatment found.".to_string()),
    })
}

/// Returns the rest of the first line starting with the given prefix
///
/// # Arguments
///
/// * 'text' - the text to search
/// * 'prefix' - the line prefix to search for
fn field_after(text: &str, prefix: &str) -> Option<String> {
    text.lines()
        .filter_map(|line| line.trim_start().strip_prefix(prefix))
        .map(|rest| rest.trim().to_string())
        .find(|rest| !rest.is_empty())
}

/// Parses the leading digits of a field value, clamped to 0-100
///
/// # Arguments
///
/// * 'value' - the raw field value, e.g. "87%"
fn leading_number(value: &str) -> u8 {
    let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();

    digits.parse::<u32>().map(|n| n.min(100) as u8).unwrap_or(0)
}

fn truncated(text: &str) -> String {
    text.chars().take(120).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RESPONSE: &str = "\
Disease: Late Blight
Confidence: 87%
Severity: High
Treatment: Remove affected leaves and apply a copper based fungicide.";

    #[test]
    fn full_response_round_trips() {
        let diagnosis = parse_diagnosis(FULL_RESPONSE).unwrap();

        assert_eq!(diagnosis.disease, "Late Blight");
        assert_eq!(diagnosis.confidence, 87);
        assert_eq!(diagnosis.severity, "High");
        assert_eq!(diagnosis.treatment, "Remove affected leaves and apply a copper based fungicide.");
    }

    #[test]
    fn display_output_parses_back() {
        let diagnosis = parse_diagnosis(FULL_RESPONSE).unwrap();
        let round_trip = parse_diagnosis(&diagnosis.to_string()).unwrap();

        assert_eq!(diagnosis, round_trip);
    }

    #[test]
    fn missing_fields_default_to_placeholders() {
        let diagnosis = parse_diagnosis("Disease: Powdery Mildew\nsome prose follows").unwrap();

        assert_eq!(diagnosis.disease, "Powdery Mildew");
        assert_eq!(diagnosis.confidence, 0);
        assert_eq!(diagnosis.severity, "N/A");
        assert_eq!(diagnosis.treatment, "No specific treatment found.");
    }

    #[test]
    fn non_numeric_confidence_defaults_to_zero() {
        let diagnosis = parse_diagnosis("Disease: Rust\nConfidence: very high").unwrap();

        assert_eq!(diagnosis.confidence, 0);
    }

    #[test]
    fn oversized_confidence_is_clamped() {
        let diagnosis = parse_diagnosis("Disease: Rust\nConfidence: 250%").unwrap();

        assert_eq!(diagnosis.confidence, 100);
    }

    #[test]
    fn prose_without_any_prefix_is_a_parse_error() {
        let result = parse_diagnosis("The plant looks perfectly healthy to me.");

        assert!(result.is_err());
    }

    #[test]
    fn flow_runs_idle_to_result() {
        let mut detection = Detection::new();
        assert_eq!(*detection.state(), DetectionState::Idle);

        detection.select(Path::new("leaf.jpg"));
        assert!(matches!(detection.state(), DetectionState::ImageSelected(_)));

        let placeholder = detection.begin_analysis().unwrap();
        assert_eq!(placeholder.disease, "Analyzing...");
        assert!(matches!(detection.state(), DetectionState::Analyzing(_)));

        let diagnosis = detection.finish(FULL_RESPONSE).unwrap();
        assert_eq!(diagnosis.disease, "Late Blight");
        assert_eq!(*detection.state(), DetectionState::Result(diagnosis));
    }

    #[test]
    fn analysis_needs_a_selected_image() {
        let mut detection = Detection::new();

        assert!(detection.begin_analysis().is_none());
        assert_eq!(*detection.state(), DetectionState::Idle);
    }

    #[test]
    fn clear_returns_to_idle_from_any_state() {
        let mut detection = Detection::new();
        detection.select(Path::new("leaf.jpg"));
        detection.begin_analysis();
        detection.clear();
        assert_eq!(*detection.state(), DetectionState::Idle);

        let mut detection = Detection::new();
        detection.select(Path::new("leaf.jpg"));
        detection.clear();
        assert_eq!(*detection.state(), DetectionState::Idle);
    }
}
