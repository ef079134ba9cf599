//! User operations. All require ROOT baseline permissions.

use super::{Operator, Target, require_id, require_non_empty};
use crate::auth::Operation;
use crate::error::OperatorResult;
use crate::model::User;

impl Operator {
    /// Create a user with a username, email and password.
    pub async fn create_user(&self, name: &str, email: &str, password: &str) -> OperatorResult<User> {
        require_non_empty(name, "username")?;
        require_non_empty(email, "email")?;
        require_non_empty(password, "password")?;
        self.authorize(Operation::CreateUser, Target::General)?;

        Ok(self.storage.create_user(name, email, password).await?)
    }

    /// Read a user by username.
    pub async fn read_user(&self, name: &str) -> OperatorResult<User> {
        require_non_empty(name, "username")?;
        self.authorize(Operation::ReadUser, Target::General)?;

        Ok(self.storage.read_user_by_name(name).await?)
    }

    pub async fn read_user_by_id(&self, id: i64) -> OperatorResult<User> {
        self.authorize(Operation::ReadUser, Target::General)?;

        Ok(self.storage.read_user_by_id(id).await?)
    }

    pub async fn read_user_by_email(&self, email: &str) -> OperatorResult<User> {
        require_non_empty(email, "email")?;
        self.authorize(Operation::ReadUser, Target::General)?;

        Ok(self.storage.read_user_by_email(email).await?)
    }

    pub async fn read_all_users(&self) -> OperatorResult<Vec<User>> {
        self.authorize(Operation::ReadAllUsers, Target::General)?;

        Ok(self.storage.read_all_users().await?)
    }

    pub async fn update_user(&self, user: &User) -> OperatorResult<()> {
        require_id(user.id, "user id")?;
        require_non_empty(&user.name, "username")?;
        require_non_empty(&user.email, "email")?;
        self.authorize(Operation::UpdateUser, Target::General)?;

        Ok(self.storage.update_user(user).await?)
    }

    pub async fn delete_user(&self, id: i64) -> OperatorResult<()> {
        require_id(id, "user id")?;
        self.authorize(Operation::DeleteUser, Target::General)?;

        Ok(self.storage.delete_user(id).await?)
    }
}
