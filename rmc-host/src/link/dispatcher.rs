//! Event dispatcher: maps an inbound V01 `CODE` to a semantic event and, for
//! fault/limit codes, the title/footnote text a [`Notifier`] should show.
//!
//! The per-code title/footnote table gives each of the three e-stop
//! categories and the eight limit/end-of-travel violations its own
//! wording, rather than a single generic message per code range.

use crate::notify::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchedEvent {
    /// CODE 1-3: emergency stop. Notify and abort.
    EmergencyStop(i16),
    /// CODE 10-19: hard/soft limit or end-of-travel violation. Notify and
    /// abort.
    LimitViolation(i16),
    /// CODE 20: complex collision detected. Notify and abort.
    ComplexCollision,
    /// CODE 40: resend request. Retransmit the current frame immediately.
    ResendRequest,
    /// CODE 41: acknowledgement. Advance to the next frame.
    Ack,
    /// Anything else: notify, stay in AwaitAck.
    Unknown(i16),
}

impl DispatchedEvent {
    pub fn from_code(code: i16) -> Self {
        match code {
            1..=3 => DispatchedEvent::EmergencyStop(code),
            10..=19 => DispatchedEvent::LimitViolation(code),
            20 => DispatchedEvent::ComplexCollision,
            40 => DispatchedEvent::ResendRequest,
            41 => DispatchedEvent::Ack,
            other => DispatchedEvent::Unknown(other),
        }
    }

    /// True for any code that terminates the sender loop after notifying.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DispatchedEvent::EmergencyStop(_)
                | DispatchedEvent::LimitViolation(_)
                | DispatchedEvent::ComplexCollision
        )
    }
}

/// Title/severity/footnote text for a fatal or informational event, as the
/// original daemon's per-code `send_amqp_message` calls spelled out.
pub fn describe(event: DispatchedEvent) -> (String, Severity, String) {
    match event {
        DispatchedEvent::EmergencyStop(1) => (
            "Emergency Stop (0)".to_string(),
            Severity::Error,
            "An uncontrolled stop by immediately removing power to the machine actuators."
                .to_string(),
        ),
        DispatchedEvent::EmergencyStop(2) => (
            "Emergency Stop (1)".to_string(),
            Severity::Error,
            "A controlled stop with power to the machine actuators available to achieve the stop then remove power when the stop is achieved."
                .to_string(),
        ),
        DispatchedEvent::EmergencyStop(code) => (
            "Emergency Stop (2)".to_string(),
            Severity::Error,
            format!("A controlled stop with power left available to the machine actuators. (code {code})"),
        ),
        DispatchedEvent::LimitViolation(10) => (
            "Shoulder Pan Limit Switch 1 Hit".to_string(),
            Severity::Error,
            "Shoulder Pan Link has exceeded the movement limits set by the physical hard stop through excessive motion clockwise."
                .to_string(),
        ),
        DispatchedEvent::LimitViolation(11) => (
            "Shoulder Pan Limit Switch 2 Hit".to_string(),
            Severity::Error,
            "Shoulder Pan Link has exceeded the movement limits set by the physical hard stop through excessive motion counter-clockwise."
                .to_string(),
        ),
        DispatchedEvent::LimitViolation(12) => (
            "Elbow Pan Limit Switch 1 Hit".to_string(),
            Severity::Error,
            "Elbow Pan Link has exceeded the movement limits set by the physical hard stop through excessive motion clockwise."
                .to_string(),
        ),
        DispatchedEvent::LimitViolation(13) => (
            "Elbow Pan Limit Switch 2 Hit".to_string(),
            Severity::Error,
            "Elbow Pan Link has exceeded the movement limits set by the physical hard stop through excessive motion counter-clockwise."
                .to_string(),
        ),
        DispatchedEvent::LimitViolation(14) => (
            "Wrist Flex Limit Switch Hit".to_string(),
            Severity::Error,
            "Wrist Flex Link has exceeded the movement limits set by the physical hard stop through excessive motion clockwise."
                .to_string(),
        ),
        DispatchedEvent::LimitViolation(15) => (
            "Wrist Flex Soft Limit Hit".to_string(),
            Severity::Warning,
            "Wrist Flex Link has exceeded the movement limits set by software through excessive motion counter-clockwise."
                .to_string(),
        ),
        DispatchedEvent::LimitViolation(16) => (
            "Wrist Roll Limit Switch Hit".to_string(),
            Severity::Error,
            "Wrist Roll Link has exceeded the movement limits set by the physical hard stop through excessive motion clockwise."
                .to_string(),
        ),
        DispatchedEvent::LimitViolation(17) => (
            "Wrist Roll Soft Limit Hit".to_string(),
            Severity::Warning,
            "Wrist Roll Link has exceeded the movement limits set by software through excessive motion counter-clockwise."
                .to_string(),
        ),
        DispatchedEvent::LimitViolation(18) => (
            "Wrist Extension End of Travel Hit".to_string(),
            Severity::Error,
            "Wrist Extension Link has exceeded the movement limits set by the physical hard stop through excessive motion driving down into the page."
                .to_string(),
        ),
        DispatchedEvent::LimitViolation(code) => (
            "Wrist Extension Start of Travel Hit".to_string(),
            Severity::Error,
            format!("Wrist Extension Link has exceeded the movement limits set by the physical hard stop through excessive motion driving up out of the page. (code {code})"),
        ),
        DispatchedEvent::ComplexCollision => (
            "Complex Collision Detected".to_string(),
            Severity::Error,
            "Some complex combination of motor joints has caused the Robot wrist to collide with the Robot shelf."
                .to_string(),
        ),
        DispatchedEvent::ResendRequest => (
            "Requested to Resend Packet".to_string(),
            Severity::Info,
            "Received request to resend packet. Sending immediately.".to_string(),
        ),
        DispatchedEvent::Ack => (
            "Acknowledgement Received".to_string(),
            Severity::Info,
            "Moving to next packet.".to_string(),
        ),
        DispatchedEvent::Unknown(code) => (
            "Unrecognized Controller Event".to_string(),
            Severity::Warning,
            format!("Received unrecognized event code {code}."),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_emergency_stop_codes() {
        for code in 1..=3 {
            assert!(DispatchedEvent::from_code(code).is_fatal());
        }
    }

    #[test]
    fn classifies_limit_violation_codes() {
        for code in 10..=19 {
            assert!(DispatchedEvent::from_code(code).is_fatal());
        }
    }

    #[test]
    fn classifies_collision_resend_and_ack() {
        assert_eq!(DispatchedEvent::from_code(20), DispatchedEvent::ComplexCollision);
        assert_eq!(DispatchedEvent::from_code(40), DispatchedEvent::ResendRequest);
        assert_eq!(DispatchedEvent::from_code(41), DispatchedEvent::Ack);
        assert!(!DispatchedEvent::ResendRequest.is_fatal());
        assert!(!DispatchedEvent::Ack.is_fatal());
    }

    #[test]
    fn unknown_code_is_not_fatal() {
        let event = DispatchedEvent::from_code(99);
        assert_eq!(event, DispatchedEvent::Unknown(99));
        assert!(!event.is_fatal());
    }

    #[test]
    fn emergency_stop_zero_has_expected_title() {
        let (title, severity, _) = describe(DispatchedEvent::EmergencyStop(1));
        assert_eq!(title, "Emergency Stop (0)");
        assert_eq!(severity, Severity::Error);
    }
}
