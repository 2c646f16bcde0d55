use bson::doc;

use crate::error::AppResult;
use crate::models::Experience;
use crate::repositories::Repository;

pub type ExperienceRepository = Repository<Experience>;

impl Repository<Experience> {
    /// Same role at the same company starting on the same date
    pub async fn find_duplicate(
        &self,
        job_title: &str,
        company: &str,
        start_date: bson::DateTime,
    ) -> AppResult<Option<Experience>> {
        self.find_one(doc! {
            "jobTitle": job_title,
            "company": company,
            "startDate": start_date,
        })
        .await
    }
}
