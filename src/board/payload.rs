//! Drag payload carried from a grabbed card to the column it is dropped on

use thiserror::Error;

use super::model::Task;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Empty drag payload")]
    Empty,

    #[error("Malformed drag payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub fn encode(task: &Task) -> Result<String, PayloadError> {
    Ok(serde_json::to_string(task)?)
}

pub fn decode(payload: &str) -> Result<Task, PayloadError> {
    if payload.trim().is_empty() {
        return Err(PayloadError::Empty);
    }
    Ok(serde_json::from_str(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TaskStatus;

    #[test]
    fn test_encode_carries_id_text_and_status() {
        let mut task = Task::new("drag me");
        task.status = TaskStatus::InProgress;
        let payload = encode(&task).unwrap();
        assert!(payload.contains(task.id.as_str()));
        assert!(payload.contains("\"status\":\"in-progress\""));
        assert_eq!(decode(&payload).unwrap(), task);
    }

    #[test]
    fn test_decode_empty() {
        assert!(matches!(decode(""), Err(PayloadError::Empty)));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(decode("not json"), Err(PayloadError::Malformed(_))));
        assert!(matches!(
            decode(r#"{"text":"x","status":"sideways"}"#),
            Err(PayloadError::Malformed(_))
        ));
    }
}
