use tracing::{info, warn};
use uuid::Uuid;

use lifeplan_domain::{Identifiable, Owned, RecurringTemplate};

use crate::{storage::FinanceStore, CoreError};

/// Request-layer operations on recurring templates, scoped to one user.
pub struct TemplateService;

impl TemplateService {
    /// Validates and stores a new template for `user_id`, returning its id.
    ///
    /// The template's owner is always overwritten with the caller.
    pub fn create(
        store: &dyn FinanceStore,
        user_id: Uuid,
        mut template: RecurringTemplate,
    ) -> Result<Uuid, CoreError> {
        template.user_id = user_id;
        template.validate().map_err(CoreError::Validation)?;

        let mut finances = store.load_user(user_id)?;
        if finances.template(template.id()).is_some() {
            return Err(CoreError::InvalidOperation(format!(
                "template {} already exists",
                template.id
            )));
        }
        let id = template.id();
        finances.templates.push(template);
        finances.touch();
        store.save_user(&finances)?;
        info!(%user_id, template_id = %id, "created recurring template");
        Ok(id)
    }

    /// Replaces an existing template owned by `user_id`.
    pub fn update(
        store: &dyn FinanceStore,
        user_id: Uuid,
        template: RecurringTemplate,
    ) -> Result<(), CoreError> {
        let template_id = template.id();
        let mut finances = store.load_user(user_id)?;
        let existing = finances
            .template_mut(template_id)
            .ok_or(CoreError::TemplateNotFound(template_id))?;
        ensure_owner(existing, user_id)?;
        if !template.is_owned_by(user_id) {
            return Err(CoreError::Forbidden(format!(
                "template {} cannot be reassigned to user {}",
                template.id, template.user_id
            )));
        }
        template.validate().map_err(CoreError::Validation)?;

        *existing = template;
        finances.touch();
        store.save_user(&finances)?;
        info!(%user_id, %template_id, "updated recurring template");
        Ok(())
    }

    /// Removes a template owned by `user_id`.
    pub fn delete(
        store: &dyn FinanceStore,
        user_id: Uuid,
        template_id: Uuid,
    ) -> Result<RecurringTemplate, CoreError> {
        let mut finances = store.load_user(user_id)?;
        let index = finances
            .templates
            .iter()
            .position(|tpl| tpl.id() == template_id)
            .ok_or(CoreError::TemplateNotFound(template_id))?;
        ensure_owner(&finances.templates[index], user_id)?;

        let removed = finances.templates.remove(index);
        finances.touch();
        store.save_user(&finances)?;
        info!(%user_id, %template_id, "deleted recurring template");
        Ok(removed)
    }

    pub fn list(store: &dyn FinanceStore, user_id: Uuid) -> Result<Vec<RecurringTemplate>, CoreError> {
        store.templates(user_id)
    }
}

fn ensure_owner(template: &RecurringTemplate, user_id: Uuid) -> Result<(), CoreError> {
    if template.is_owned_by(user_id) {
        Ok(())
    } else {
        warn!(template_id = %template.id, %user_id, "template ownership check failed");
        Err(CoreError::Forbidden(format!(
            "template {} does not belong to user {user_id}",
            template.id
        )))
    }
}
