use crate::error::AppResult;
use crate::models::Education;
use crate::repositories::Repository;

pub type EducationRepository = Repository<Education>;

impl Repository<Education> {
    /// Another entry with the same institution, degree, field and start date
    pub async fn find_duplicate(&self, candidate: &Education) -> AppResult<Option<Education>> {
        let existing = self.find_one(candidate.identity_filter()).await?;
        Ok(existing.filter(|e| e.id != candidate.id))
    }
}
