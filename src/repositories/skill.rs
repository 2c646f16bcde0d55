use bson::doc;

use crate::error::AppResult;
use crate::models::Skill;
use crate::repositories::Repository;

pub type SkillRepository = Repository<Skill>;

impl Repository<Skill> {
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Skill>> {
        self.find_one(doc! { "name": name }).await
    }
}
