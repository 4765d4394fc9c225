//! Request Handler
//!
//! Validates command fields, stores uploads, calls the record store and
//! renders the JSON response body.

use std::sync::Arc;

use crate::config::Config;
use crate::error::{BoardError, Result};
use crate::protocol::{Command, NewAchievement, NewMember, Response};
use crate::store::RecordStore;
use crate::uploads::{UploadKind, UploadNamer};

/// Turns commands into store calls
pub struct Handler {
    store: Arc<RecordStore>,
    uploads: UploadNamer,
    default_avatar: String,
}

impl Handler {
    pub fn new(store: Arc<RecordStore>, uploads: UploadNamer, config: &Config) -> Self {
        Self {
            store,
            uploads,
            default_avatar: config.default_avatar.clone(),
        }
    }

    /// Execute a command and map the outcome onto a response status
    pub fn handle(&self, command: Command) -> Response {
        match self.dispatch(command) {
            Ok(response) => response,
            Err(e @ BoardError::MemberNotFound(_)) => Response::not_found(&e.to_string()),
            Err(BoardError::InvalidInput(message)) => Response::bad_request(&message),
            Err(e) => {
                tracing::warn!("Command failed: {}", e);
                Response::error(&e.to_string())
            }
        }
    }

    fn dispatch(&self, command: Command) -> Result<Response> {
        match command {
            Command::ListMembers => Response::success(&self.store.list_members()),
            Command::AddMember(fields) => self.add_member(fields),
            Command::AddAchievement(fields) => self.add_achievement(fields),
            Command::Ping => Ok(Response::ok(Some(b"PONG".to_vec()))),
        }
    }

    fn add_member(&self, fields: NewMember) -> Result<Response> {
        if fields.name.trim().is_empty() || fields.role.trim().is_empty() {
            return Err(BoardError::InvalidInput(
                "name and role are required".to_string(),
            ));
        }

        let avatar = match fields.avatar {
            Some(upload) => self
                .uploads
                .store(UploadKind::Avatar, &upload.filename, &upload.bytes)?,
            None => self.default_avatar.clone(),
        };

        let member = self.store.add_member(&fields.name, &fields.role, &avatar);
        Response::success(&member)
    }

    fn add_achievement(&self, fields: NewAchievement) -> Result<Response> {
        if fields.category.trim().is_empty() {
            return Err(BoardError::InvalidInput("category is required".to_string()));
        }

        let upload = fields
            .image
            .ok_or_else(|| BoardError::InvalidInput("image file is required".to_string()))?;
        let image = self
            .uploads
            .store(UploadKind::Achievement, &upload.filename, &upload.bytes)?;

        let achievement = self.store.add_achievement(fields.member_id, &image, &fields.category)?;
        Response::success(&achievement)
    }
}
