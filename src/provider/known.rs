use super::{Provider, DEFAULT_SSH_USER};

struct KnownProvider {
    name: &'static str,
    display_name: &'static str,
    hostname: &'static str,
    web_url: &'static str,
    key_suffix: &'static str,
}

const KNOWN: &[KnownProvider] = &[
    KnownProvider {
        name: "github",
        display_name: "GitHub",
        hostname: "github.com",
        web_url: "https://github.com/settings/ssh/new",
        key_suffix: "gh",
    },
    KnownProvider {
        name: "gitlab",
        display_name: "GitLab",
        hostname: "gitlab.com",
        web_url: "https://gitlab.com/-/profile/keys",
        key_suffix: "gl",
    },
    KnownProvider {
        name: "gitea",
        display_name: "Gitea",
        hostname: "gitea.com",
        web_url: "https://gitea.com/user/settings/keys",
        key_suffix: "gitea",
    },
];

impl From<&KnownProvider> for Provider {
    fn from(p: &KnownProvider) -> Self {
        Provider {
            name: p.name.to_string(),
            display_name: p.display_name.to_string(),
            hostname: p.hostname.to_string(),
            ssh_user: DEFAULT_SSH_USER.to_string(),
            ssh_port: None,
            web_url: p.web_url.to_string(),
            key_suffix: p.key_suffix.to_string(),
        }
    }
}

/// Well-known providers, in menu order.
pub fn defaults() -> Vec<Provider> {
    KNOWN.iter().map(Provider::from).collect()
}

pub fn lookup(name: &str) -> Option<Provider> {
    KNOWN.iter().find(|p| p.name == name).map(Provider::from)
}

/// Provider assumed for accounts stored before providers were tracked.
pub fn github() -> Provider {
    Provider::from(&KNOWN[0])
}

pub fn names() -> Vec<&'static str> {
    KNOWN.iter().map(|p| p.name).collect()
}
