//! Member Service - registry of borrowers

use chrono::Utc;

use crate::domain::{Collection, DomainError, DomainResult, load_records, save_records};
use crate::models::{Member, MemberInput, MemberUpdate};
use crate::services::loan_service::CirculationEngine;
use crate::services::validation::{admit_member_id, validate_email, validate_member_name};

/// List members, optionally filtered by name or id
pub async fn list_members(
    engine: &CirculationEngine,
    search: Option<&str>,
) -> DomainResult<Vec<Member>> {
    let members: Vec<Member> = load_records(engine.store(), Collection::Members).await?;

    Ok(match search {
        Some(term) => members.into_iter().filter(|m| m.matches(term)).collect(),
        None => members,
    })
}

pub async fn get_member(engine: &CirculationEngine, id: &str) -> DomainResult<Member> {
    let members: Vec<Member> = load_records(engine.store(), Collection::Members).await?;
    members
        .into_iter()
        .find(|m| m.has_id(id))
        .ok_or_else(|| DomainError::not_found("member", id))
}

/// Register a member. The email is checked first, then the id is trimmed
/// and compared case-insensitively against the registry.
pub async fn register_member(
    engine: &CirculationEngine,
    input: MemberInput,
) -> DomainResult<Member> {
    validate_email(&input.email)?;
    validate_member_name(&input.name)?;

    let _guard = engine.lock_writes().await;
    let mut members: Vec<Member> = load_records(engine.store(), Collection::Members).await?;
    let id = admit_member_id(&input.id, &members)?;

    let member = Member {
        id,
        name: input.name.trim().to_string(),
        member_type: input.member_type,
        email: input.email,
        phone: input.phone.trim().to_string(),
        join_date: input
            .join_date
            .unwrap_or_else(|| Utc::now().date_naive()),
    };
    members.push(member.clone());
    save_records(engine.store(), Collection::Members, &members).await?;

    tracing::info!("Member {} registered", member.id);
    Ok(member)
}

pub async fn update_member(
    engine: &CirculationEngine,
    id: &str,
    update: MemberUpdate,
) -> DomainResult<Member> {
    validate_email(&update.email)?;
    validate_member_name(&update.name)?;

    let _guard = engine.lock_writes().await;
    let mut members: Vec<Member> = load_records(engine.store(), Collection::Members).await?;

    let member = members
        .iter_mut()
        .find(|m| m.has_id(id))
        .ok_or_else(|| DomainError::not_found("member", id))?;

    member.name = update.name.trim().to_string();
    member.member_type = update.member_type;
    member.email = update.email;
    member.phone = update.phone.trim().to_string();
    let updated = member.clone();

    save_records(engine.store(), Collection::Members, &members).await?;
    tracing::info!("Member {} updated", id);
    Ok(updated)
}

/// Remove a member. Their loans remain as history.
pub async fn delete_member(engine: &CirculationEngine, id: &str) -> DomainResult<()> {
    let _guard = engine.lock_writes().await;
    let mut members: Vec<Member> = load_records(engine.store(), Collection::Members).await?;

    let before = members.len();
    members.retain(|m| !m.has_id(id));
    if members.len() == before {
        return Err(DomainError::not_found("member", id));
    }

    save_records(engine.store(), Collection::Members, &members).await?;
    tracing::info!("Member {} deleted", id);
    Ok(())
}
