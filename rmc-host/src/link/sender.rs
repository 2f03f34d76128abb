//! The stop-and-wait link-layer sender.
//!
//! A single `tokio::select!` loop races an inbound stream against a
//! timeout: here the inbound stream is a `FramedRead` over
//! [`InboundFrameCodec`] and the timeout is the resend timer. The frame
//! actually retransmitted on a RESEND or a timeout is the same packed byte
//! buffer produced the first time — nothing is regenerated, so a
//! retransmit can never silently diverge from the original.

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;
use tokio_stream::StreamExt;
use tokio_util::codec::FramedRead;

use crate::crc;
use crate::frame::{FrameV02, InboundFrameCodec, ReceiverEvent};
use crate::link::dispatcher::{describe, DispatchedEvent};
use crate::notify::Notifier;

/// How long the sender waits for an ACK/RESEND before retransmitting
/// unprompted.
pub const DEFAULT_RESEND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("controller reported fault, code {0}")]
    ControllerFault(i16),
    #[error("inbound frame stream closed while awaiting acknowledgement")]
    StreamClosed,
    #[error("self-check failed: packed frame does not satisfy its own CRC residue")]
    SelfCheckFailed,
}

/// Packs `frame`, verifies its own CRC residue, and writes it to `writer`.
/// Mirrors the pre-`write` integrity check the controller-side daemon
/// performs on every outbound frame; a residue failure here means `pack`
/// and `crc::compute` have gone out of sync and is fatal, not retryable.
async fn transmit<W: AsyncWrite + Unpin>(writer: &mut W, frame: &FrameV02) -> Result<(), LinkError> {
    let packed = frame.pack();
    if !crc::residue_is_zero(&packed) {
        return Err(LinkError::SelfCheckFailed);
    }
    writer.write_all(&packed).await?;
    writer.flush().await?;
    Ok(())
}

enum State {
    Ready,
    AwaitAck { deadline: Instant },
}

/// Streams `frames` to `writer`, driving the {Ready, AwaitAck} handshake
/// against inbound event frames read from `reader`. Returns once every
/// frame has been acknowledged, or as soon as the controller reports a
/// fatal fault.
pub async fn send_all<R, W, N>(
    frames: &[FrameV02],
    reader: R,
    mut writer: W,
    notifier: &N,
    resend_timeout: Duration,
) -> Result<(), LinkError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    N: Notifier,
{
    let mut inbound = FramedRead::new(reader, InboundFrameCodec::default());
    let mut state = State::Ready;
    let mut cursor = 0usize;

    loop {
        match state {
            State::Ready => {
                if cursor >= frames.len() {
                    return Ok(());
                }
                transmit(&mut writer, &frames[cursor]).await?;
                state = State::AwaitAck {
                    deadline: Instant::now() + resend_timeout,
                };
            }
            State::AwaitAck { deadline } => {
                tokio::select! {
                    event = inbound.next() => {
                        match event {
                            Some(Ok(ReceiverEvent::Frame(frame))) => {
                                match DispatchedEvent::from_code(frame.code) {
                                    DispatchedEvent::Ack => {
                                        notifier.state(cursor, frames[cursor].theta1, frames[cursor].theta2, frames[cursor].d3);
                                        cursor += 1;
                                        state = State::Ready;
                                    }
                                    DispatchedEvent::ResendRequest => {
                                        let (title, severity, footnote) = describe(DispatchedEvent::ResendRequest);
                                        notifier.message(&title, severity, &footnote);
                                        transmit(&mut writer, &frames[cursor]).await?;
                                        state = State::AwaitAck {
                                            deadline: Instant::now() + resend_timeout,
                                        };
                                    }
                                    fatal @ (DispatchedEvent::EmergencyStop(_)
                                        | DispatchedEvent::LimitViolation(_)
                                        | DispatchedEvent::ComplexCollision) => {
                                        let (title, severity, footnote) = describe(fatal);
                                        notifier.message(&title, severity, &footnote);
                                        return Err(LinkError::ControllerFault(frame.code));
                                    }
                                    unknown => {
                                        let (title, severity, footnote) = describe(unknown);
                                        notifier.message(&title, severity, &footnote);
                                        // Stay in AwaitAck at the same deadline; an
                                        // unrecognized event doesn't reset the resend clock.
                                        state = State::AwaitAck { deadline };
                                    }
                                }
                            }
                            Some(Ok(ReceiverEvent::BadVersion(_))) | Some(Ok(ReceiverEvent::FrameCorrupt)) => {
                                // Noise or a damaged frame: stay at the same deadline and
                                // let the resend timer recover.
                                state = State::AwaitAck { deadline };
                            }
                            Some(Err(io_err)) => return Err(LinkError::Io(io_err)),
                            None => return Err(LinkError::StreamClosed),
                        }
                    }
                    _ = tokio::time::sleep_until(deadline) => {
                        transmit(&mut writer, &frames[cursor]).await?;
                        state = State::AwaitAck {
                            deadline: Instant::now() + resend_timeout,
                        };
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::RecordingNotifier;
    use tokio::io::duplex;

    fn ack() -> crate::frame::FrameV01 {
        crate::frame::FrameV01 { code: 41 }
    }

    #[tokio::test]
    async fn acks_drive_the_cursor_to_completion() {
        let frames = vec![
            FrameV02 { code: 0, theta1: 1, theta2: 2, d3: 3 },
            FrameV02 { code: 0, theta1: 4, theta2: 5, d3: 6 },
        ];
        let (mut controller_side, host_side) = duplex(1024);
        let (host_reader, host_writer) = tokio::io::split(host_side);
        let notifier = RecordingNotifier::default();

        let sender = tokio::spawn(async move {
            send_all(&frames, host_reader, host_writer, &notifier, Duration::from_secs(5)).await
        });

        // Two frames expected; ack each as it arrives.
        let mut buf = [0u8; crate::frame::V02_SIZE];
        for _ in 0..2 {
            tokio::io::AsyncReadExt::read_exact(&mut controller_side, &mut buf)
                .await
                .unwrap();
            tokio::io::AsyncWriteExt::write_all(&mut controller_side, &ack().pack())
                .await
                .unwrap();
        }

        let result = sender.await.unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn emergency_stop_aborts_the_send_loop() {
        let frames = vec![FrameV02 { code: 0, theta1: 1, theta2: 2, d3: 3 }];
        let (mut controller_side, host_side) = duplex(1024);
        let (host_reader, host_writer) = tokio::io::split(host_side);
        let notifier = RecordingNotifier::default();
        let notifier_clone = notifier.clone();

        let sender = tokio::spawn(async move {
            send_all(&frames, host_reader, host_writer, &notifier_clone, Duration::from_secs(5)).await
        });

        let mut buf = [0u8; crate::frame::V02_SIZE];
        tokio::io::AsyncReadExt::read_exact(&mut controller_side, &mut buf)
            .await
            .unwrap();
        let estop = crate::frame::FrameV01 { code: 1 };
        tokio::io::AsyncWriteExt::write_all(&mut controller_side, &estop.pack())
            .await
            .unwrap();

        let result = sender.await.unwrap();
        assert!(matches!(result, Err(LinkError::ControllerFault(1))));
        assert_eq!(notifier.messages.lock().unwrap().len(), 1);
    }
}
