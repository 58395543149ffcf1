/// Tokens held by the client for the current run. The client never inspects
/// them, it only forwards them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub user_token: Option<String>,
    pub admin_token: Option<String>,
}

impl Session {
    pub fn new(user_token: Option<String>, admin_token: Option<String>) -> Session {
        return Session {
            user_token: user_token.filter(|token| return !token.is_empty()),
            admin_token: admin_token.filter(|token| return !token.is_empty()),
        };
    }

    pub fn is_logged_in(&self) -> bool {
        return self.user_token.is_some();
    }

    #[cfg(test)]
    pub fn is_admin(&self) -> bool {
        return self.admin_token.is_some();
    }

    pub fn logout(&mut self) {
        self.user_token = None;
    }
}
