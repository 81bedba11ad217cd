use std::path::Path;

use anyhow::{Context as _, Result};
use tracing::{debug, warn};

use crate::discovery::{self, DiscoveredAccount};
use crate::ssh;
use crate::storage::Account;

use super::commands::resolve_provider;
use super::context::Context;
use super::prompt::{parse_choice, Prompter};

/// Which candidates the user picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Skip,
    All,
    Indices(Vec<usize>),
}

/// Parse the migration menu answer: `0` skips, `count + 1` takes all,
/// otherwise comma-separated one-based indices. Empty input skips.
pub fn parse_selection(input: &str, count: usize) -> std::result::Result<Selection, String> {
    let input = input.trim();
    if input.is_empty() || input == "0" {
        return Ok(Selection::Skip);
    }
    if input == (count + 1).to_string() {
        return Ok(Selection::All);
    }

    input
        .split(',')
        .map(|choice| parse_choice(choice, count).ok_or_else(|| choice.trim().to_string()))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(Selection::Indices)
}

/// Offer to import existing git/SSH identities. Runs once: when
/// `migration_done` is set or accounts exist (unless `force`) it does
/// nothing.
pub fn check_and_offer_migration(
    ctx: &Context,
    prompter: &mut dyn Prompter,
    force: bool,
) -> Result<()> {
    let mut config = ctx.store.load()?;
    if config.migration_done || (!force && !config.accounts.is_empty()) {
        return Ok(());
    }

    let discovered = discovery::scan(ctx.git.as_ref(), &ctx.ssh);
    if discovered.is_empty() {
        debug!("nothing to migrate");
        config.migration_done = true;
        ctx.store.save(&config)?;
        return Ok(());
    }

    eprintln!("Welcome to krakn!");
    eprintln!("Found existing git/SSH configuration:");
    for (i, acc) in discovered.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, describe(acc));
    }

    if !prompter.confirm("Would you like to import any of these accounts?", true) {
        config.migration_done = true;
        ctx.store.save(&config)?;
        return Ok(());
    }

    let selected = select_accounts(prompter, &discovered);
    let mut imported = 0;
    for candidate in selected {
        match import_candidate(ctx, prompter, candidate) {
            Ok(account) => {
                config.upsert(account);
                imported += 1;
            }
            Err(e) => eprintln!("Failed to import {}: {:#}", candidate.source, e),
        }
    }

    if config.current().is_none() {
        if let Some(first) = config.accounts.first().map(|a| a.name.clone()) {
            config.set_current(&first)?;
        }
    }
    config.migration_done = true;
    ctx.store
        .save(&config)
        .context("Failed to save migrated config")?;

    if imported > 0 {
        eprintln!("Imported {} account(s).", imported);
        eprintln!("Next steps:");
        eprintln!("  krakn list                   see your accounts");
        eprintln!("  krakn config ~/work work     set up directory-based switching");
        eprintln!("  krakn add                    add more accounts");
    }
    Ok(())
}

/// Run discovery from the CLI entry point; failures only warn.
pub fn first_run(ctx: &Context, prompter: &mut dyn Prompter) {
    if let Err(e) = check_and_offer_migration(ctx, prompter, false) {
        warn!("first-run migration skipped: {:#}", e);
    }
}

pub fn cmd_migrate(ctx: &Context, prompter: &mut dyn Prompter) -> Result<()> {
    let mut config = ctx.store.load()?;
    config.migration_done = false;
    ctx.store.save(&config)?;
    check_and_offer_migration(ctx, prompter, true)
}

fn describe(acc: &DiscoveredAccount) -> String {
    let mut line = acc.source.clone();
    if !acc.name.is_empty() {
        line.push_str(&format!(" - Name: {}", acc.name));
    }
    if !acc.email.is_empty() {
        line.push_str(&format!(" - Email: {}", acc.email));
    }
    if !acc.username.is_empty() {
        line.push_str(&format!(" - Username: {}", acc.username));
    }
    line
}

fn select_accounts<'a>(
    prompter: &mut dyn Prompter,
    discovered: &'a [DiscoveredAccount],
) -> Vec<&'a DiscoveredAccount> {
    eprintln!("Select accounts to import:");
    eprintln!("  0. Skip");
    for (i, acc) in discovered.iter().enumerate() {
        let hint = if acc.suggested { " (recommended)" } else { "" };
        eprintln!("  {}. {}{}", i + 1, acc.source, hint);
    }
    eprintln!("  {}. Import all", discovered.len() + 1);

    loop {
        let input = prompter.input("Enter your choice(s) separated by commas (e.g., 1,3)", None);
        match parse_selection(&input, discovered.len()) {
            Ok(Selection::Skip) => return Vec::new(),
            Ok(Selection::All) => return discovered.iter().collect(),
            Ok(Selection::Indices(indices)) => {
                return indices.into_iter().map(|i| &discovered[i]).collect()
            }
            Err(bad) => eprintln!("Invalid choice: {}", bad),
        }
    }
}

fn import_candidate(
    ctx: &Context,
    prompter: &mut dyn Prompter,
    candidate: &DiscoveredAccount,
) -> Result<Account> {
    eprintln!("Importing: {}", candidate.source);

    let suggested_name = candidate
        .alias_account
        .clone()
        .or_else(|| Some(candidate.username.clone()).filter(|u| !u.is_empty()))
        .unwrap_or_else(|| "default".to_string());
    let name = prompter.input("Account name", Some(&suggested_name));

    let email = if candidate.email.is_empty() {
        prompter.input("Email address", None)
    } else {
        candidate.email.clone()
    };

    let provider = match &candidate.provider {
        Some(p) => p.clone(),
        None => resolve_provider(ctx, prompter, None, None)?,
    };

    let username = if candidate.username.is_empty() {
        let default = Some(candidate.name.as_str()).filter(|n| !n.is_empty());
        prompter.input(&format!("{} username", provider.display_name), default)
    } else {
        candidate.username.clone()
    };

    let ssh_key = select_ssh_key(ctx, prompter, &name);

    let account = Account {
        name,
        email,
        ssh_key,
        username,
        provider,
        is_default: false,
    };
    eprintln!("Configured account '{}'", account.name);
    eprintln!("  Email:    {}", account.email);
    eprintln!("  Username: {}", account.username);
    eprintln!("  SSH Host: {}", account.ssh_host());
    if !account.ssh_key.is_empty() {
        eprintln!("  SSH Key:  {}", account.ssh_key);
    }
    Ok(account)
}

/// Pick an existing key, a custom path, or none (empty string).
fn select_ssh_key(ctx: &Context, prompter: &mut dyn Prompter, account_name: &str) -> String {
    let ssh_dir = ctx.ssh.dir();
    let keys = ssh::list_existing_keys(ssh_dir);

    if keys.is_empty() {
        eprintln!("No existing SSH keys found.");
        let input = prompter.input("SSH key path (leave empty to generate later)", None);
        if input.is_empty() {
            return input;
        }
        return ctx.paths.expand(Path::new(&input)).display().to_string();
    }

    eprintln!("SSH key options:");
    eprintln!("  0. Generate new key later");
    for (i, key) in keys.iter().enumerate() {
        let hint = if key.contains(account_name) || key.contains("ed25519") {
            " (suggested)"
        } else {
            ""
        };
        eprintln!("  {}. {}{}", i + 1, key, hint);
    }
    eprintln!("  or enter a custom path");

    loop {
        let input = prompter.input("Select SSH key", Some("0"));
        if input == "0" {
            return String::new();
        }
        if let Ok(n) = input.parse::<usize>() {
            match parse_choice(&input, keys.len()) {
                Some(i) => return ssh_dir.join(&keys[i]).display().to_string(),
                None => {
                    eprintln!("Invalid selection: {}", n);
                    continue;
                }
            }
        }

        let path = ctx.paths.expand(Path::new(&input));
        if path.exists() {
            return path.display().to_string();
        }
        eprintln!("SSH key not found: {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::commands::tests::test_context;
    use crate::cli::prompt::tests::Scripted;
    use crate::git::tests::FakeGit;
    use crate::settings::{Paths, Settings};
    use crate::ssh::keygen::tests::FakeKeygen;

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("0", 3), Ok(Selection::Skip));
        assert_eq!(parse_selection("", 3), Ok(Selection::Skip));
        assert_eq!(parse_selection("4", 3), Ok(Selection::All));
        assert_eq!(parse_selection("1, 3", 3), Ok(Selection::Indices(vec![0, 2])));
        assert_eq!(parse_selection("2", 3), Ok(Selection::Indices(vec![1])));
        assert_eq!(parse_selection("1,5", 3), Err("5".to_string()));
        assert_eq!(parse_selection("x", 3), Err("x".to_string()));
    }

    #[test]
    fn test_nothing_discovered_marks_done() {
        let (_temp, ctx) = test_context();
        let mut p = Scripted::new(&[]);

        check_and_offer_migration(&ctx, &mut p, false).unwrap();

        assert!(ctx.store.load().unwrap().migration_done);
        assert!(p.asked.is_empty());
    }

    #[test]
    fn test_declined_migration_marks_done() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = Context::with_tools(
            Paths::under(temp.path()),
            Settings::default(),
            Box::new(FakeGit::with_global(&[("user.name", "Jane")])),
            Box::new(FakeKeygen::default()),
        );
        let mut p = Scripted::new(&["n"]);

        check_and_offer_migration(&ctx, &mut p, false).unwrap();

        let config = ctx.store.load().unwrap();
        assert!(config.migration_done);
        assert!(config.accounts.is_empty());

        // Second run asks nothing
        check_and_offer_migration(&ctx, &mut Scripted::new(&[]), false).unwrap();
    }

    #[test]
    fn test_import_all() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = Context::with_tools(
            Paths::under(temp.path()),
            Settings::default(),
            Box::new(FakeGit::with_global(&[
                ("user.name", "Jane Doe"),
                ("user.email", "jane@doe.dev"),
            ])),
            Box::new(FakeKeygen::default()),
        );
        let ssh_dir = ctx.paths.ssh_dir.clone();
        fs::create_dir_all(&ssh_dir).unwrap();
        fs::write(
            ssh_dir.join("config"),
            "Host github.com-work\n  HostName github.com\n  User git\n  IdentityFile ~/.ssh/id_work\n",
        )
        .unwrap();
        fs::write(ssh_dir.join("id_work"), "").unwrap();
        fs::write(ssh_dir.join("id_work.pub"), "").unwrap();

        let mut p = Scripted::new(&[
            "",              // import?
            "3",             // all
            "personal",      // name for global identity
            "2",             // provider: GitLab
            "",              // username defaults to user.name
            "0",             // no key
            "",              // name for ssh alias: work
            "work@corp.com", // email
            "1",             // key: id_work
        ]);

        check_and_offer_migration(&ctx, &mut p, false).unwrap();
        assert!(p.finished());

        let config = ctx.store.load().unwrap();
        assert!(config.migration_done);
        assert_eq!(config.list_names(), vec!["personal", "work"]);
        assert_eq!(config.current_account, "personal");

        let personal = config.find_by_name("personal").unwrap();
        assert_eq!(personal.email, "jane@doe.dev");
        assert_eq!(personal.username, "Jane Doe");
        assert_eq!(personal.provider.name, "gitlab");
        assert_eq!(personal.ssh_key, "");

        let work = config.find_by_name("work").unwrap();
        assert_eq!(work.provider.name, "github");
        assert_eq!(work.username, "git");
        assert_eq!(work.ssh_key, ssh_dir.join("id_work").display().to_string());
    }

    #[test]
    fn test_migrate_reruns_with_existing_accounts() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = Context::with_tools(
            Paths::under(temp.path()),
            Settings::default(),
            Box::new(FakeGit::with_global(&[("user.email", "x@y.z")])),
            Box::new(FakeKeygen::default()),
        );
        let mut config = ctx.store.load().unwrap();
        config.upsert(Account {
            name: "old".to_string(),
            email: "old@y.z".to_string(),
            ssh_key: String::new(),
            username: "old".to_string(),
            provider: crate::provider::lookup("github").unwrap(),
            is_default: false,
        });
        config.migration_done = true;
        ctx.store.save(&config).unwrap();

        let mut p = Scripted::new(&["", "1", "imported", "1", "me", ""]);
        cmd_migrate(&ctx, &mut p).unwrap();
        assert!(p.finished());

        let config = ctx.store.load().unwrap();
        assert_eq!(config.list_names(), vec!["old", "imported"]);
        assert_eq!(config.current_account, "old");
        assert_eq!(config.find_by_name("imported").unwrap().email, "x@y.z");
        assert!(config.migration_done);
    }
}
