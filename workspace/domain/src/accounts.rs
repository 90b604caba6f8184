//! Account registry: creation, update, lookup, credential lifecycle,
//! and the transactional cascade that tears an account down.
//!
//! All validation happens in pure functions invoked explicitly before
//! any write; nothing is enforced through implicit callbacks. Emails
//! are lower-cased before every uniqueness check and before
//! persistence, so uniqueness is always computed on the normalized
//! form.

use std::sync::LazyLock;

use chrono::Utc;
use model::entities::{account, micropost, relationship};
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{DomainError, FieldError, Result, ValidationReason};
use crate::password::{self, RememberToken};

pub const NAME_MAX: usize = 50;
pub const EMAIL_MAX: usize = 255;
pub const PASSWORD_MIN: usize = 6;

/// Restrictive address grammar: word characters, `+`, `-` and `.` in
/// the local part; a dot-containing domain of letters, digits and
/// hyphens with no consecutive dots and no trailing dot.
static EMAIL_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[\w+\-.]+@[a-z\d\-]+(\.[a-z\d\-]+)*\.[a-z]+$")
        .expect("email pattern must compile")
});

/// Fields required to register an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Partial update of an account. Blank or absent password fields leave
/// the stored credential unchanged.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

fn validate_name(name: &str, errors: &mut Vec<FieldError>) {
    if name.trim().is_empty() {
        errors.push(FieldError::new("name", ValidationReason::Blank));
    } else if name.chars().count() > NAME_MAX {
        errors.push(FieldError::new(
            "name",
            ValidationReason::TooLong { max: NAME_MAX },
        ));
    }
}

fn validate_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.trim().is_empty() {
        errors.push(FieldError::new("email", ValidationReason::Blank));
        return;
    }
    if email.chars().count() > EMAIL_MAX {
        errors.push(FieldError::new(
            "email",
            ValidationReason::TooLong { max: EMAIL_MAX },
        ));
    }
    if !EMAIL_FORMAT.is_match(email) {
        errors.push(FieldError::new("email", ValidationReason::WrongFormat));
    }
}

fn validate_password(password: &str, confirmation: &str, errors: &mut Vec<FieldError>) {
    if password.trim().is_empty() {
        errors.push(FieldError::new("password", ValidationReason::Blank));
    } else if password.chars().count() < PASSWORD_MIN {
        errors.push(FieldError::new(
            "password",
            ValidationReason::TooShort { min: PASSWORD_MIN },
        ));
    }
    if password != confirmation {
        errors.push(FieldError::new(
            "password_confirmation",
            ValidationReason::MismatchedConfirmation,
        ));
    }
}

/// True when the store rejected a write over a uniqueness or other
/// constraint, as opposed to failing outright.
fn is_constraint_violation(error: &DbErr) -> bool {
    let message = error.to_string().to_lowercase();
    message.contains("unique") || message.contains("constraint")
}

async fn email_taken(
    db: &DatabaseConnection,
    email: &str,
    excluding: Option<i32>,
) -> Result<bool> {
    let mut query = account::Entity::find().filter(account::Column::Email.eq(email));
    if let Some(id) = excluding {
        query = query.filter(account::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

/// Registers a new account. A blank password is rejected here;
/// "blank means keep" applies only to updates.
#[instrument(skip(db, new_account), fields(email = %new_account.email))]
pub async fn create_account(
    db: &DatabaseConnection,
    new_account: NewAccount,
) -> Result<account::Model> {
    let email = new_account.email.to_lowercase();

    let mut errors = Vec::new();
    validate_name(&new_account.name, &mut errors);
    validate_email(&email, &mut errors);
    validate_password(
        &new_account.password,
        &new_account.password_confirmation,
        &mut errors,
    );
    if !errors.iter().any(|e| e.field == "email") && email_taken(db, &email, None).await? {
        errors.push(FieldError::new("email", ValidationReason::NotUnique));
    }
    if !errors.is_empty() {
        debug!(?errors, "account registration rejected");
        return Err(DomainError::Validation(errors));
    }

    let password_digest = password::hash_password(&new_account.password)?;
    let active = account::ActiveModel {
        name: Set(new_account.name),
        email: Set(email.clone()),
        password_digest: Set(password_digest),
        remember_digest: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match active.insert(db).await {
        Ok(model) => {
            info!(id = model.id, "account created");
            Ok(model)
        }
        // A concurrent registration can slip past the pre-check; the
        // unique index then reports the same outcome as the pre-check.
        Err(error) if is_constraint_violation(&error) => {
            warn!(%email, "account registration lost uniqueness race");
            Err(DomainError::invalid("email", ValidationReason::NotUnique))
        }
        Err(error) => Err(error.into()),
    }
}

/// Re-validates and applies a partial update. Blank password fields
/// mean "not updating the credential".
#[instrument(skip(db, changes))]
pub async fn update_account(
    db: &DatabaseConnection,
    id: i32,
    changes: AccountChanges,
) -> Result<account::Model> {
    let existing = find_account(db, id).await?;

    let name = changes.name.unwrap_or_else(|| existing.name.clone());
    let email = changes
        .email
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|| existing.email.clone());
    let password_change = match changes.password {
        Some(p) if !p.trim().is_empty() => {
            Some((p, changes.password_confirmation.unwrap_or_default()))
        }
        _ => None,
    };

    let mut errors = Vec::new();
    validate_name(&name, &mut errors);
    validate_email(&email, &mut errors);
    if let Some((password, confirmation)) = &password_change {
        validate_password(password, confirmation, &mut errors);
    }
    if !errors.iter().any(|e| e.field == "email") && email_taken(db, &email, Some(id)).await? {
        errors.push(FieldError::new("email", ValidationReason::NotUnique));
    }
    if !errors.is_empty() {
        debug!(?errors, "account update rejected");
        return Err(DomainError::Validation(errors));
    }

    let mut active: account::ActiveModel = existing.into();
    active.name = Set(name);
    active.email = Set(email);
    if let Some((password, _)) = password_change {
        active.password_digest = Set(password::hash_password(&password)?);
    }

    match active.update(db).await {
        Ok(model) => {
            info!(id = model.id, "account updated");
            Ok(model)
        }
        Err(error) if is_constraint_violation(&error) => {
            Err(DomainError::invalid("email", ValidationReason::NotUnique))
        }
        Err(error) => Err(error.into()),
    }
}

/// Destroys an account together with everything it exclusively owns:
/// its microposts and every follow edge it appears in, on either side.
/// The whole cascade runs in one transaction; a failure at any step
/// rolls all of it back.
#[instrument(skip(db))]
pub async fn destroy_account(db: &DatabaseConnection, id: i32) -> Result<()> {
    // Resolve the id first so a missing account surfaces as NotFound
    // rather than an empty cascade.
    let account = find_account(db, id).await?;

    db.transaction::<_, (), DbErr>(move |txn| {
        Box::pin(async move {
            micropost::Entity::delete_many()
                .filter(micropost::Column::AuthorId.eq(id))
                .exec(txn)
                .await?;
            relationship::Entity::delete_many()
                .filter(
                    Condition::any()
                        .add(relationship::Column::FollowerId.eq(id))
                        .add(relationship::Column::FollowedId.eq(id)),
                )
                .exec(txn)
                .await?;
            account::Entity::delete_by_id(id).exec(txn).await?;
            Ok(())
        })
    })
    .await?;

    info!(id, email = %account.email, "account destroyed");
    Ok(())
}

pub async fn find_account(db: &DatabaseConnection, id: i32) -> Result<account::Model> {
    account::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound {
            entity: "account",
            id,
        })
}

/// Case-insensitive lookup; the argument is normalized the same way
/// stored addresses are.
pub async fn find_account_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<account::Model>> {
    let normalized = email.to_lowercase();
    Ok(account::Entity::find()
        .filter(account::Column::Email.eq(normalized))
        .one(db)
        .await?)
}

/// Password login: resolves the address and checks the clear password
/// against the stored digest. Unknown address and wrong password are
/// indistinguishable to the caller.
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password_clear: &str,
) -> Result<Option<account::Model>> {
    match find_account_by_email(db, email).await? {
        Some(account) if password::verify_password(password_clear, &account.password_digest) => {
            Ok(Some(account))
        }
        _ => Ok(None),
    }
}

/// Issues a fresh remember token, persists its digest and returns the
/// clear token for cookie transport.
#[instrument(skip(db))]
pub async fn remember(db: &DatabaseConnection, id: i32) -> Result<String> {
    let account = find_account(db, id).await?;
    let token = RememberToken::generate()?;

    let mut active: account::ActiveModel = account.into();
    active.remember_digest = Set(Some(token.digest));
    active.update(db).await?;

    debug!(id, "remember token issued");
    Ok(token.clear)
}

/// Drops the stored remember digest; any outstanding clear token stops
/// authenticating.
#[instrument(skip(db))]
pub async fn forget(db: &DatabaseConnection, id: i32) -> Result<()> {
    let account = find_account(db, id).await?;

    let mut active: account::ActiveModel = account.into();
    active.remember_digest = Set(None);
    active.update(db).await?;

    debug!(id, "remember token forgotten");
    Ok(())
}
