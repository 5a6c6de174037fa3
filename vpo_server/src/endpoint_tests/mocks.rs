use mockall::mock;
use vpo_engine::{
    db_types::{NewUser, UserAccount},
    traits::UserManagement,
    AuthApiError,
};

mock! {
    pub UserManager {}
    impl UserManagement for UserManager {
        async fn is_email_taken(&self, email: &str) -> Result<bool, AuthApiError>;
        async fn create_user(&self, user: NewUser) -> Result<UserAccount, AuthApiError>;
        async fn fetch_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthApiError>;
        async fn fetch_user_by_id(&self, id: i64) -> Result<Option<UserAccount>, AuthApiError>;
        async fn fetch_all_users(&self) -> Result<Vec<UserAccount>, AuthApiError>;
    }
}
