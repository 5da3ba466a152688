use std::collections::HashMap;

/// Static username/password pairs, parsed once from a `user:pass,user:pass`
/// string. Malformed entries are dropped rather than reported.
#[derive(Clone, Default)]
pub struct CredentialStore {
    accounts: HashMap<String, String>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("accounts", &self.accounts.len())
            .finish()
    }
}

impl CredentialStore {
    pub fn parse(raw: &str) -> Self {
        let accounts = raw
            .split(',')
            .map(|entry| unquote(entry.trim()))
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| entry.split_once(':'))
            .map(|(username, password)| (username.trim().to_owned(), password.trim().to_owned()))
            .collect();

        Self { accounts }
    }

    pub fn lookup(&self, username: &str) -> Option<&str> {
        self.accounts.get(username).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// No accounts means authentication is switched off for the service.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

fn unquote(entry: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|quote| {
            entry
                .strip_prefix(*quote)
                .and_then(|rest| rest.strip_suffix(*quote))
        })
        .unwrap_or(entry)
}
