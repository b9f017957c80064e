use std::fs;
use std::path::{Path, PathBuf};
use glob::glob;
use log::{info, warn};
use crate::dashboard::Dashboard;
use crate::detection::{Detection, DETECTION_PROMPT};
use crate::errors::LeafWorkerError;
use crate::manager_gemini::Gemini;
use crate::models::views::ChatMessage;

const CHAT_MODEL_TAG: &str = "Gemini AI + Live Data";

/// Answers question files dropped into the chat inbox.
///
/// Every '*.txt' file is read as a user question, sent to the assistant
/// bridge together with the current dashboard context, and answered by a
/// sibling '*.answer.txt' file. The processed question moves to done/.
///
/// # Arguments
///
/// * 'chat_dir' - the chat inbox directory
/// * 'gemini' - the assistant bridge
/// * 'dashboard' - current views and the chat log to append to
pub fn check_chat(chat_dir: &str, gemini: &Gemini, dashboard: &mut Dashboard)
                  -> Result<usize, LeafWorkerError> {

    let mut handled = 0;

    for entry in glob(&format!("{}/*.txt", chat_dir))? {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("unreadable chat inbox entry: {}", e);
                continue;
            }
        };
        if path.to_string_lossy().ends_with(".answer.txt") {
            continue;
        }

        let question = fs::read_to_string(&path)?;
        let question = question.trim();
        if question.is_empty() {
            move_to_done(&path)?;
            continue;
        }

        info!("answering chat question from {:?}", path.file_name().unwrap_or_default());
        dashboard.chat.push(ChatMessage::user(question));

        let answer = gemini.chat(question, &dashboard.context());
        dashboard.chat.push(ChatMessage::ai(&answer, CHAT_MODEL_TAG));

        fs::write(answer_path(&path), answer)?;
        move_to_done(&path)?;
        handled += 1;
    }

    Ok(handled)
}

/// Runs the detection flow for every image dropped into the detect inbox.
///
/// Each image walks the select/analyze/result states, its diagnosis is
/// written to a sibling '*.diagnosis.txt' file, and the image moves to
/// done/. A response the parser rejects outright is logged and written
/// as raw text instead.
///
/// # Arguments
///
/// * 'detect_dir' - the detect inbox directory
/// * 'gemini' - the image analysis bridge
pub fn check_detections(detect_dir: &str, gemini: &Gemini) -> Result<usize, LeafWorkerError> {
    let mut handled = 0;

    for entry in glob(&format!("{}/*.*", detect_dir))? {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("unreadable detect inbox entry: {}", e);
                continue;
            }
        };
        let Some(mime_type) = mime_for(&path) else {
            continue;
        };

        let mut detection = Detection::new();
        detection.select(&path);

        let placeholder = match detection.begin_analysis() {
            Some(placeholder) => placeholder,
            None => continue,
        };
        info!("{} {:?}", placeholder.disease, path.file_name().unwrap_or_default());

        let image = fs::read(&path)?;
        let response = gemini.analyze_image(&image, mime_type, DETECTION_PROMPT);

        match detection.finish(&response) {
            Ok(diagnosis) => {
                fs::write(diagnosis_path(&path), diagnosis.to_string())?;
            }
            Err(e) => {
                warn!("diagnosis parse failed: {}", e);
                fs::write(diagnosis_path(&path), response)?;
            }
        }

        move_to_done(&path)?;
        handled += 1;
    }

    Ok(handled)
}

/// Maps an image extension to the MIME type sent with the inline data part.
/// Files with other extensions are not detection requests.
///
/// # Arguments
///
/// * 'path' - path of the dropped file
fn mime_for(path: &Path) -> Option<&'static str> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

fn answer_path(question: &Path) -> PathBuf {
    question.with_extension("answer.txt")
}

fn diagnosis_path(image: &Path) -> PathBuf {
    image.with_extension("diagnosis.txt")
}

/// Moves a processed inbox file into the done/ subdirectory so it is not
/// picked up again on the next tick
///
/// # Arguments
///
/// * 'path' - the processed file
fn move_to_done(path: &Path) -> Result<(), LeafWorkerError> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let done = parent.join("done");
    fs::create_dir_all(&done)?;

    let name = path.file_name()
        .ok_or(LeafWorkerError::new(format!("illegal inbox path [{}]", path.display())))?;
    fs::rename(path, done.join(name))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_supported_image_extensions() {
        assert_eq!(mime_for(Path::new("in/leaf.jpg")), Some("image/jpeg"));
        assert_eq!(mime_for(Path::new("in/leaf.JPEG")), Some("image/jpeg"));
        assert_eq!(mime_for(Path::new("in/leaf.png")), Some("image/png"));
        assert_eq!(mime_for(Path::new("in/leaf.webp")), Some("image/webp"));
        assert_eq!(mime_for(Path::new("in/leaf.gif")), None);
        assert_eq!(mime_for(Path::new("in/noext")), None);
    }

    #[test]
    fn derives_answer_and_diagnosis_paths() {
        assert_eq!(answer_path(Path::new("chat/q1.txt")), PathBuf::from("chat/q1.answer.txt"));
        assert_eq!(diagnosis_path(Path::new("detect/leaf.jpg")), PathBuf::from("detect/leaf.diagnosis.txt"));
    }
}
