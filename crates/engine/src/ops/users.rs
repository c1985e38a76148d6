use chrono::Utc;
use sea_orm::{ActiveValue, Condition, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, SignupCmd, users, util};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

impl Engine {
    /// Register a new user.
    ///
    /// Username and email must be unique. The username is NFC-normalized so
    /// lookups are stable across input methods. Password hashing is the
    /// deployment's concern; the engine stores what it receives.
    pub async fn signup(&self, cmd: SignupCmd) -> ResultEngine<users::Model> {
        let username = util::nfc_normalize(&cmd.username);
        util::validate_text_len(&username, "username", 1, 64)?;
        let email = cmd.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(EngineError::InvalidField(
                "email must contain '@'".to_string(),
            ));
        }
        let password = normalize_required_text(&cmd.password, "password")?;

        with_tx!(self, |db_tx| {
            let existing = users::Entity::find()
                .filter(
                    Condition::any()
                        .add(users::Column::Username.eq(username.clone()))
                        .add(users::Column::Email.eq(email.clone())),
                )
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(username.clone()));
            }

            let user = users::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                username: ActiveValue::Set(username.clone()),
                email: ActiveValue::Set(email.clone()),
                password: ActiveValue::Set(password.clone()),
                about: ActiveValue::Set(normalize_optional_text(cmd.about.as_deref())),
                avatar: ActiveValue::Set(normalize_optional_text(cmd.avatar.as_deref())),
                created_at: ActiveValue::Set(Utc::now()),
            };
            Ok(user.insert(&db_tx).await?)
        })
    }

    /// Look up a user by primary key.
    pub async fn find_user_by_id(&self, user_id: &str) -> ResultEngine<Option<users::Model>> {
        users::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await
            .map_err(Into::into)
    }

    /// Look up a user by their (normalized) username.
    pub async fn find_user_by_username(&self, username: &str) -> ResultEngine<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Username.eq(util::nfc_normalize(username)))
            .one(&self.database)
            .await
            .map_err(Into::into)
    }

    /// Look up a user by username or email, whichever matches first.
    pub async fn find_user_by_username_or_email(
        &self,
        username: &str,
        email: Option<&str>,
    ) -> ResultEngine<Option<users::Model>> {
        let mut condition = Condition::any().add(users::Column::Username.eq(util::nfc_normalize(username)));
        if let Some(email) = email {
            condition = condition.add(users::Column::Email.eq(email.trim().to_lowercase()));
        }
        users::Entity::find()
            .filter(condition)
            .one(&self.database)
            .await
            .map_err(Into::into)
    }
}
