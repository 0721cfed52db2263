//! Company page management.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::company::{Company, CompanyMember, CompanyMemberRole};
use super::error::Error;
use super::group::slugify;
use super::ids::{CompanyId, UserId};
use super::pagination::{Page, PageOf};
use super::ports::CompanyRepository;

/// Company creation fields.
#[derive(Debug, Clone)]
pub struct CreateCompanyInput {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// Partial company update.
#[derive(Debug, Clone, Default)]
pub struct UpdateCompanyInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub struct CompanyService {
    companies: Arc<dyn CompanyRepository>,
}

impl CompanyService {
    pub fn new(companies: Arc<dyn CompanyRepository>) -> Self {
        Self { companies }
    }

    /// Create a company page; the creator becomes its owner member.
    pub async fn create_company(
        &self,
        user_id: UserId,
        input: CreateCompanyInput,
    ) -> Result<Company, Error> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(Error::invalid_request("name must not be empty"));
        }
        let slug = match input.slug {
            Some(slug) => slug,
            None => slugify(name),
        };
        if slug.is_empty() {
            return Err(Error::invalid_request("slug must not be empty"));
        }

        if self.companies.find_by_slug(&slug).await?.is_some() {
            return Err(Error::conflict("a company with this slug already exists"));
        }

        let company = Company::new(name.to_owned(), slug, input.description, user_id);
        let owner = CompanyMember {
            company_id: company.id,
            user_id,
            role: CompanyMemberRole::Owner,
            joined_at: Utc::now(),
        };
        self.companies.insert(&company, &owner).await?;
        info!(company_id = %company.id, owner = %user_id, "created company page");
        Ok(company)
    }

    pub async fn get_company(&self, id: CompanyId) -> Result<Company, Error> {
        self.companies
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("company not found"))
    }

    pub async fn list_companies(&self, page: Page) -> Result<PageOf<Company>, Error> {
        let items = self.companies.list(page.offset(), page.limit()).await?;
        let total = self.companies.count().await?;
        Ok(PageOf::new(items, total, page))
    }

    /// Companies the caller belongs to.
    pub async fn list_my_companies(&self, user_id: UserId) -> Result<Vec<Company>, Error> {
        Ok(self.companies.list_for_user(user_id).await?)
    }

    /// Owner/admin members only.
    pub async fn update_company(
        &self,
        user_id: UserId,
        id: CompanyId,
        changes: UpdateCompanyInput,
    ) -> Result<Company, Error> {
        let mut company = self.get_company(id).await?;
        self.require_manager(id, user_id).await?;

        if let Some(name) = changes.name {
            let name = name.trim().to_owned();
            if name.is_empty() {
                return Err(Error::invalid_request("name must not be empty"));
            }
            company.name = name;
        }
        if let Some(description) = changes.description {
            let trimmed = description.trim();
            company.description = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            };
        }
        company.updated_at = Utc::now();
        self.companies.update(&company).await?;
        Ok(company)
    }

    /// Whether the user may author posts as this company.
    pub async fn can_act_for(&self, company_id: CompanyId, user_id: UserId) -> Result<bool, Error> {
        Ok(self
            .companies
            .find_membership(company_id, user_id)
            .await?
            .is_some())
    }

    async fn require_manager(&self, company_id: CompanyId, user_id: UserId) -> Result<(), Error> {
        let membership = self
            .companies
            .find_membership(company_id, user_id)
            .await?
            .ok_or_else(|| Error::forbidden("you are not a member of this company"))?;
        if !membership.role.can_manage() {
            return Err(Error::forbidden("only owners and admins may edit the company"));
        }
        Ok(())
    }
}
