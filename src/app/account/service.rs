//! 账户存储

use std::sync::{Arc, RwLock};

use super::model::{Account, LoginRequest, RegisterRequest};
use crate::core::error::CoreError;

#[derive(Clone, Default)]
pub struct AccountStore {
    accounts: Arc<RwLock<Vec<Account>>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, CoreError> {
        Ok(self.accounts.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, CoreError> {
        Ok(self.len()? == 0)
    }

    /// 注册新账户，用户名和邮箱都必须未被占用（区分大小写），返回用户名
    pub fn register(&self, request: RegisterRequest) -> Result<String, CoreError> {
        let (Some(username), Some(email), Some(password)) = (
            present(request.username),
            present(request.email),
            present(request.password),
        ) else {
            return Err(CoreError::missing_fields(&["username", "email", "password"]));
        };

        let mut accounts = self.accounts.write()?;
        if accounts
            .iter()
            .any(|account| account.username == username || account.email == email)
        {
            return Err(CoreError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }

        accounts.push(Account {
            username: username.clone(),
            email,
            password,
        });
        Ok(username)
    }

    /// 用户名与密码都精确匹配时返回用户名；
    /// 用户不存在和密码错误返回同一个错误。
    pub fn authenticate(&self, request: LoginRequest) -> Result<String, CoreError> {
        let (Some(username), Some(password)) =
            (present(request.username), present(request.password))
        else {
            return Err(CoreError::missing_fields(&["username", "password"]));
        };

        self.accounts
            .read()?
            .iter()
            .find(|account| account.username == username && account.password == password)
            .map(|account| account.username.clone())
            .ok_or(CoreError::InvalidCredentials)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
