//! WebSocket message dispatch
//!
//! Turns one client message into at most one reply. Validation and policy
//! live in [`Session`]; this layer only maps outcomes onto the wire.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::{Session, SessionError};
use crate::types::Cursor;

/// Handle a client message and return optional response
pub async fn handle_message(msg: ClientMessage, session: &mut Session) -> Option<ServerMessage> {
    let result = match msg {
        ClientMessage::CreateSession { username } => session
            .create(&username)
            .map(|handle| Some(ServerMessage::SessionEntered { handle })),

        ClientMessage::JoinSession {
            username,
            session_id,
        } => session
            .join(&username, &session_id)
            .map(|handle| Some(ServerMessage::SessionEntered { handle })),

        ClientMessage::LeaveSession => {
            session.leave();
            Ok(Some(ServerMessage::SessionLeft))
        }

        // The echo reports the change back once the transport delivers it
        ClientMessage::CodeChange { code } => {
            session.change_code(code);
            Ok(None)
        }

        ClientMessage::SelectLanguage { language } => session
            .select_language(&language)
            .map(|()| Some(code_state(session))),

        ClientMessage::ResetCode => {
            session.reset_code();
            Ok(Some(code_state(session)))
        }

        ClientMessage::RunCode => session
            .run_code()
            .await
            .map(|result| Some(ServerMessage::ExecutionFinished { result })),

        ClientMessage::ChatMessage { content } => session.send_chat(&content).map(|_| None),

        ClientMessage::MoveCursor { line, column } => session
            .move_cursor(Cursor { line, column })
            .map(|user_id| {
                Some(ServerMessage::CursorMoved {
                    user_id,
                    line,
                    column,
                })
            }),

        ClientMessage::RemoveUser { user_id } => session
            .remove_user(&user_id)
            .map(|user| Some(ServerMessage::UserRemoved { user_id: user.id })),

        ClientMessage::RequestDownload => {
            let (filename, contents) = session.download();
            Ok(Some(ServerMessage::Download { filename, contents }))
        }

        ClientMessage::RequestPreview => Ok(Some(ServerMessage::Preview {
            html: session.preview(),
        })),

        ClientMessage::RequestState => Ok(Some(ServerMessage::State {
            snapshot: session.store().snapshot(),
        })),
    };

    result.unwrap_or_else(|e: SessionError| {
        tracing::warn!("Rejected client action: {}", e);
        Some(e.into())
    })
}

fn code_state(session: &Session) -> ServerMessage {
    ServerMessage::CodeUpdated {
        code: session.store().code().to_string(),
        language: session.store().language().to_string(),
    }
}
