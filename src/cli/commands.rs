use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::git::{self, IncludeOutcome, Scope};
use crate::provider::{self, Provider};
use crate::ssh::{self, AppendOutcome};
use crate::storage::{default_key_path, Account, ConfigStore, Upsert};

use super::context::Context;
use super::prompt::Prompter;

const CUSTOM_CHOICE: &str = "Custom/Self-hosted (e.g., git.company.com, code.myorg.io)";

/// Values for `krakn add`; missing ones are prompted for.
#[derive(Debug, Default)]
pub struct AddArgs {
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub provider: Option<String>,
    pub hostname: Option<String>,
    pub key: Option<String>,
}

// -- Provider selection -------------------------------------------------------

/// Resolve a provider from flags, falling back to an interactive menu.
pub fn resolve_provider(
    ctx: &Context,
    prompter: &mut dyn Prompter,
    name: Option<&str>,
    hostname: Option<&str>,
) -> Result<Provider> {
    match (name, hostname) {
        (Some(provider::CUSTOM), host) | (None, host @ Some(_)) => {
            create_custom_provider(prompter, host)
        }
        (Some(name), _) => provider::lookup(name).with_context(|| {
            format!(
                "Unknown provider: '{}'. Available: {}, custom",
                name,
                provider::known::names().join(", ")
            )
        }),
        (None, None) => select_provider(ctx, prompter),
    }
}

fn select_provider(ctx: &Context, prompter: &mut dyn Prompter) -> Result<Provider> {
    let known = provider::defaults();
    let mut options: Vec<String> = known
        .iter()
        .map(|p| format!("{} ({})", p.display_name, p.hostname))
        .collect();
    options.push(CUSTOM_CHOICE.to_string());

    let preselected = ctx
        .settings
        .default_provider
        .as_deref()
        .and_then(|d| known.iter().position(|p| p.name == d));

    eprintln!("Select Git hosting provider:");
    match prompter.choose("Enter choice", &options, preselected) {
        Some(i) if i < known.len() => Ok(known[i].clone()),
        Some(_) => create_custom_provider(prompter, None),
        None => anyhow::bail!("Invalid provider choice"),
    }
}

fn create_custom_provider(prompter: &mut dyn Prompter, hostname: Option<&str>) -> Result<Provider> {
    let hostname = match hostname {
        Some(h) => h.to_string(),
        None => prompter.input("Hostname (e.g., git.company.com, code.myorg.io)", None),
    };
    if !provider::is_valid_hostname(&hostname) {
        anyhow::bail!("Invalid hostname format: {}", hostname);
    }

    let display_name = prompter.input("Display name", Some(&hostname));
    let ssh_user = prompter.input("SSH user", Some(provider::DEFAULT_SSH_USER));
    let port_input = prompter.input("SSH port", Some("22"));
    let port: u16 = port_input
        .parse()
        .with_context(|| format!("Invalid SSH port: {}", port_input))?;
    let default_url = format!("https://{}", hostname);
    let web_url = prompter.input("SSH key management URL", Some(&default_url));

    let custom = Provider::custom(
        &hostname,
        Some(&display_name),
        Some(&ssh_user),
        Some(port),
        Some(&web_url),
    )?;

    eprintln!("Custom provider configuration:");
    eprintln!("  Name:       {}", custom.display_name);
    eprintln!("  Hostname:   {}", custom.hostname);
    eprintln!("  SSH User:   {}", custom.ssh_user);
    if let Some(port) = custom.explicit_port() {
        eprintln!("  SSH Port:   {}", port);
    }
    eprintln!("  Web URL:    {}", custom.web_url);
    eprintln!("  Key Suffix: {}", custom.key_suffix);

    if !prompter.confirm("Save this configuration?", true) {
        anyhow::bail!("Configuration cancelled");
    }
    Ok(custom)
}

fn default_provider(ctx: &Context, flag: Option<&str>) -> Result<Provider> {
    let name = flag
        .or(ctx.settings.default_provider.as_deref())
        .unwrap_or("github");
    provider::lookup(name).with_context(|| format!("Unknown provider: '{}'", name))
}

// -- Shared steps -------------------------------------------------------------

fn offer_host_alias(ctx: &Context, prompter: &mut dyn Prompter, account: &Account) -> Result<()> {
    let prompt = format!(
        "Append host alias '{}' to {}?",
        account.ssh_host(),
        ctx.ssh.path().display()
    );
    if !prompter.confirm(&prompt, true) {
        eprintln!("Skipped modifying {}.", ctx.ssh.path().display());
        return Ok(());
    }

    match ctx
        .ssh
        .append_host_alias(account)
        .context("Failed to update SSH config")?
    {
        AppendOutcome::Appended => eprintln!("SSH config updated."),
        AppendOutcome::AlreadyPresent => {
            eprintln!("Host alias '{}' already present in SSH config.", account.ssh_host())
        }
    }
    Ok(())
}

fn print_public_key(account: &Account, key_path: &Path) {
    let public = ssh::public_key_path(key_path);
    match fs::read_to_string(&public) {
        Ok(key) => println!("{}", key.trim_end()),
        Err(e) => eprintln!("Could not read public key {}: {}", public.display(), e),
    }
    eprintln!(
        "Add this public key to {}: {}",
        account.provider.display_name, account.provider.web_url
    );
}

fn save_account(ctx: &Context, account: Account) -> Result<Upsert> {
    let mut config = ctx.store.load()?;
    let outcome = config.upsert(account);
    ctx.store.save(&config).context("Failed to save config")?;
    Ok(outcome)
}

fn required(prompter: &mut dyn Prompter, value: Option<String>, prompt: &str) -> Result<String> {
    let value = value.unwrap_or_else(|| prompter.input(prompt, None));
    if value.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", prompt);
    }
    Ok(value.trim().to_string())
}

// -- Commands -----------------------------------------------------------------

pub fn cmd_generate_key(
    ctx: &Context,
    prompter: &mut dyn Prompter,
    name: &str,
    email: &str,
    provider_name: Option<&str>,
    hostname: Option<&str>,
) -> Result<()> {
    if name.trim().is_empty() || email.trim().is_empty() {
        anyhow::bail!("Please provide both --name and --email");
    }

    let provider = match (provider_name, hostname) {
        (Some(provider::CUSTOM), _) | (_, Some(_)) => {
            resolve_provider(ctx, prompter, provider_name, hostname)?
        }
        _ => default_provider(ctx, provider_name)?,
    };
    let key_path = default_key_path(ctx.ssh.dir(), &provider, name);

    ssh::generate_key_pair(ctx.keygen.as_ref(), &key_path, email)
        .context("Failed to generate SSH key")?;

    let mut account = Account {
        name: name.to_string(),
        email: email.to_string(),
        ssh_key: key_path.display().to_string(),
        username: String::new(),
        provider,
        is_default: false,
    };

    offer_host_alias(ctx, prompter, &account)?;

    eprintln!("SSH key created at: {}", key_path.display());
    print_public_key(&account, &key_path);
    eprintln!("Host alias for SSH: {}", account.ssh_host());

    if prompter.confirm("Save this as an account configuration?", true) {
        let username = prompter.input(
            &format!("{} username", account.provider.display_name),
            None,
        );
        if username.is_empty() {
            eprintln!("No username given, account not saved.");
            return Ok(());
        }
        account.username = username;
        save_account(ctx, account)?;
        eprintln!("Account '{}' saved to configuration.", name);
    }

    Ok(())
}

pub fn cmd_add(ctx: &Context, prompter: &mut dyn Prompter, args: AddArgs) -> Result<()> {
    let name = required(prompter, args.name, "Account name (e.g., 'work', 'personal')")?;
    let email = required(prompter, args.email, "Email address")?;
    let provider = resolve_provider(
        ctx,
        prompter,
        args.provider.as_deref(),
        args.hostname.as_deref(),
    )?;
    let username = required(
        prompter,
        args.username,
        &format!("{} username", provider.display_name),
    )?;

    let default_key = default_key_path(ctx.ssh.dir(), &provider, &name);
    let key_input = match args.key {
        Some(k) => k,
        None => prompter.input("SSH key path", Some(&default_key.display().to_string())),
    };
    let key_path = ctx.resolve_path(Path::new(&key_input))?;

    if !key_path.exists() {
        eprintln!("SSH key not found at {}", key_path.display());
        if !prompter.confirm("Do you want to generate it now?", true) {
            anyhow::bail!("Cannot add account without SSH key");
        }
        ssh::generate_key_pair(ctx.keygen.as_ref(), &key_path, &email)
            .context("Failed to generate SSH key")?;
        eprintln!("SSH key created at: {}", key_path.display());
    }

    let account = Account {
        name: name.clone(),
        email,
        ssh_key: key_path.display().to_string(),
        username,
        provider,
        is_default: false,
    };

    offer_host_alias(ctx, prompter, &account)?;
    let outcome = save_account(ctx, account.clone())?;

    match outcome {
        Upsert::Added => eprintln!("Account '{}' added successfully!", name),
        Upsert::Replaced => eprintln!("Account '{}' updated.", name),
    }
    eprintln!("SSH Host: {}", account.ssh_host());
    eprintln!("Clone with: git clone {}", account.ssh_clone_url("owner/repo.git"));
    eprintln!("Config saved to: {}", ctx.store.path().display());
    Ok(())
}

pub fn cmd_list(ctx: &Context, global_only: bool) -> Result<()> {
    if global_only {
        print_identity(ctx, "Global Git Configuration", Some(&Scope::Global));
        return Ok(());
    }

    let config = ctx.store.load()?;
    if config.accounts.is_empty() {
        eprintln!("No accounts configured yet. Use 'krakn add' to add your first account.");
        return Ok(());
    }

    println!("Configured accounts:");
    println!();
    for account in &config.accounts {
        let marker = if config.is_current(&account.name) {
            " (current)"
        } else {
            ""
        };
        let key = if account.ssh_key.is_empty() {
            "(not generated)"
        } else {
            account.ssh_key.as_str()
        };
        println!("{}{}", account.name, marker);
        println!("  Email:    {}", account.email);
        println!("  Provider: {} (@{})", account.provider.display_name, account.username);
        println!("  SSH Key:  {}", key);
        println!("  SSH Host: {}", account.ssh_host());
        if account.provider.is_custom() {
            println!("  Hostname: {}", account.provider.hostname);
        }
        println!();
    }

    print_identity(ctx, "Current Git Configuration", None);
    println!();
    print_identity(ctx, "Global Git Configuration", Some(&Scope::Global));
    Ok(())
}

fn print_identity(ctx: &Context, title: &str, scope: Option<&Scope>) {
    println!("{}:", title);
    match ctx.git.get(scope, "user.name") {
        Some(name) => println!("  Name:  {}", name),
        None => println!("  No git user configured"),
    }
    if let Some(email) = ctx.git.get(scope, "user.email") {
        println!("  Email: {}", email);
    }
}

pub fn cmd_use(ctx: &Context, account_name: &str, path: Option<&Path>, global: bool) -> Result<()> {
    let scope = match (path, global) {
        (Some(p), true) => anyhow::bail!(
            "Cannot specify both a path and --global. Use either 'krakn use {} {}' or 'krakn use {} --global'",
            account_name,
            p.display(),
            account_name
        ),
        (Some(p), false) => Scope::Local(ctx.resolve_path(p)?),
        (None, _) => Scope::Global,
    };

    let mut config = ctx.store.load()?;
    let account = match config.find_by_name(account_name) {
        Some(a) => a.clone(),
        None => anyhow::bail!(config.not_found_message(account_name)),
    };

    git::set_identity(ctx.git.as_ref(), &account.username, &account.email, &scope)
        .context("Failed to update git identity")?;

    if scope == Scope::Global {
        config.set_current(account_name)?;
        ctx.store.save(&config).context("Failed to save config")?;
    }

    match &scope {
        Scope::Global => eprintln!("Switched to account '{}' globally", account_name),
        Scope::Local(repo) => eprintln!(
            "Switched to account '{}' for repository at {}",
            account_name,
            repo.display()
        ),
    }
    eprintln!("  Name:     {}", account.username);
    eprintln!("  Email:    {}", account.email);
    eprintln!("  SSH Host: {}", account.ssh_host());
    if let Scope::Local(_) = scope {
        eprintln!(
            "To clone with this account: git clone {}",
            account.ssh_clone_url("owner/repo.git")
        );
    }
    Ok(())
}

pub fn cmd_global(ctx: &Context, account_name: &str) -> Result<()> {
    cmd_use(ctx, account_name, None, true)?;
    eprintln!("This is the default for all repositories unless a conditional include overrides it.");
    Ok(())
}

pub fn cmd_config(
    ctx: &Context,
    prompter: &mut dyn Prompter,
    dir: Option<&Path>,
    account_name: Option<&str>,
) -> Result<()> {
    let config = ctx.store.load()?;

    let (dir, account) = match (dir, account_name) {
        (Some(dir), Some(name)) => {
            let dir = ctx.resolve_path(dir)?;
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
            match config.find_by_name(name) {
                Some(a) => (dir, a.clone()),
                None => anyhow::bail!(config.not_found_message(name)),
            }
        }
        (None, None) => {
            if config.accounts.is_empty() {
                anyhow::bail!(config.not_found_message(""));
            }
            let dir = std::env::current_dir().context("Failed to get current directory")?;
            eprintln!("Current directory: {}", dir.display());
            eprintln!("Available accounts:");
            let options: Vec<String> = config
                .accounts
                .iter()
                .map(|a| format!("{} ({})", a.name, a.email))
                .collect();
            match prompter.choose("Select account number", &options, None) {
                Some(i) => (dir, config.accounts[i].clone()),
                None => anyhow::bail!("Invalid selection"),
            }
        }
        _ => anyhow::bail!(
            "Provide either no arguments (interactive) or both directory and account name"
        ),
    };

    setup_directory(ctx, &dir, &account)
}

fn setup_directory(ctx: &Context, dir: &Path, account: &Account) -> Result<()> {
    let dir_config = git::write_directory_config(dir, account)
        .with_context(|| format!("Failed to create {}/.gitconfig", dir.display()))?;

    match ctx
        .global_git
        .add_conditional_include(dir, &dir_config)
        .context("Failed to add conditional include")?
    {
        IncludeOutcome::Added => eprintln!(
            "Added conditional include to {}",
            ctx.global_git.path().display()
        ),
        IncludeOutcome::AlreadyPresent => eprintln!(
            "Conditional include already exists in {}",
            ctx.global_git.path().display()
        ),
    }

    eprintln!(
        "Directory '{}' configured for account '{}'",
        dir.display(),
        account.name
    );
    eprintln!("  Name:        {}", account.username);
    eprintln!("  Email:       {}", account.email);
    eprintln!("  Config file: {}", dir_config.display());
    eprintln!("  SSH Host:    {}", account.ssh_host());
    Ok(())
}

pub fn cmd_show_includes(ctx: &Context) -> Result<()> {
    let includes = ctx.global_git.list_conditional_includes();

    println!("Global Git Configuration: {}", ctx.global_git.path().display());
    println!("Conditional Includes:");
    if includes.is_empty() {
        println!("  No conditional includes configured yet");
        println!("  Use 'krakn config <dir> <account>' to create one");
        return Ok(());
    }
    for include in includes {
        println!("  {}", include.gitdir);
        println!("    -> {}", include.path);
    }
    Ok(())
}

pub fn cmd_remove(ctx: &Context, prompter: &mut dyn Prompter, account_name: &str) -> Result<()> {
    let mut config = ctx.store.load()?;
    if config.find_by_name(account_name).is_none() {
        anyhow::bail!(config.not_found_message(account_name));
    }

    let prompt = format!("Are you sure you want to remove account '{}'?", account_name);
    if !prompter.confirm(&prompt, false) {
        eprintln!("Account removal cancelled");
        return Ok(());
    }

    let (account, notice) = remove_account(&mut config, account_name)?;
    ctx.store.save(&config).context("Failed to save config")?;
    eprintln!("Account '{}' removed.", account_name);
    if let Some(notice) = notice {
        eprintln!("{}", notice);
    }

    if !account.ssh_key.is_empty() {
        eprintln!("SSH key still exists at: {}", account.ssh_key);
        if prompter.confirm("Do you want to remove the SSH key files?", false) {
            for (path, result) in ssh::remove_key_pair(Path::new(&account.ssh_key)) {
                match result {
                    Ok(()) => eprintln!("Removed: {}", path.display()),
                    Err(e) => eprintln!("Could not remove {}: {}", path.display(), e),
                }
            }
        }
    }

    eprintln!("You may also want to:");
    eprintln!(
        "  - Remove the key from {}: {}",
        account.provider.display_name, account.provider.web_url
    );
    eprintln!(
        "  - Clean up conditional includes in {}",
        ctx.global_git.path().display()
    );
    Ok(())
}

/// Remove `name`, with a note on where the current account went when the
/// removed one was current.
fn remove_account(config: &mut ConfigStore, name: &str) -> Result<(Account, Option<String>)> {
    let was_current = config.current_account == name;
    let account = config.remove(name)?;
    let notice = was_current.then(|| match config.current() {
        Some(next) => format!("Current account switched to '{}'", next.name),
        None => "No current account".to_string(),
    });
    Ok((account, notice))
}

pub fn cmd_providers() -> Result<()> {
    for p in provider::defaults() {
        println!("{:<8} {:<8} {:<12} {}", p.name, p.display_name, p.hostname, p.web_url);
    }
    println!("{:<8} self-hosted, use --provider custom --hostname <host>", provider::CUSTOM);
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::cli::prompt::tests::Scripted;
    use crate::git::tests::FakeGit;
    use crate::settings::{Paths, Settings};
    use crate::ssh::keygen::tests::FakeKeygen;

    pub(crate) fn test_context() -> (TempDir, Context) {
        let temp = tempdir().unwrap();
        let ctx = Context::with_tools(
            Paths::under(temp.path()),
            Settings::default(),
            Box::new(FakeGit::default()),
            Box::new(FakeKeygen::default()),
        );
        (temp, ctx)
    }

    fn seed(ctx: &Context, names: &[&str]) {
        for n in names {
            save_account(
                ctx,
                Account {
                    name: n.to_string(),
                    email: format!("{}@example.com", n),
                    ssh_key: String::new(),
                    username: format!("{}-user", n),
                    provider: provider::lookup("github").unwrap(),
                    is_default: false,
                },
            )
            .unwrap();
        }
    }

    #[test]
    fn test_add_generates_key_and_host_alias() {
        let (_temp, ctx) = test_context();
        let mut p = Scripted::new(&[
            "work",        // name
            "me@corp.com", // email
            "1",           // provider: GitHub
            "jdoe",        // username
            "",            // key path: default
            "",            // generate now
            "",            // append host alias
        ]);

        cmd_add(&ctx, &mut p, AddArgs::default()).unwrap();
        assert!(p.finished());

        let config = ctx.store.load().unwrap();
        let acc = config.find_by_name("work").unwrap();
        let key = ctx.paths.ssh_dir.join("id_ed25519_gh_work");
        assert_eq!(acc.ssh_key, key.display().to_string());
        assert_eq!(acc.username, "jdoe");
        assert_eq!(config.current_account, "work");
        assert!(key.exists());
        assert!(ctx.ssh.has_host("github.com-work"));
    }

    #[test]
    fn test_add_custom_provider_from_flags() {
        let (_temp, ctx) = test_context();
        let mut p = Scripted::new(&[
            "",     // display name
            "",     // ssh user
            "2222", // port
            "",     // web url
            "",     // save configuration
            "",     // key path: default
            "n",    // generate key
        ]);
        let args = AddArgs {
            name: Some("me".to_string()),
            email: Some("me@company.com".to_string()),
            username: Some("me".to_string()),
            provider: None,
            hostname: Some("git.company.com".to_string()),
            key: None,
        };

        let err = cmd_add(&ctx, &mut p, args).unwrap_err();
        assert!(err.to_string().contains("without SSH key"));
        assert!(p.finished());
        assert!(ctx.store.load().unwrap().accounts.is_empty());
    }

    #[test]
    fn test_add_rejects_unknown_provider() {
        let (_temp, ctx) = test_context();
        let mut p = Scripted::new(&[]);
        let args = AddArgs {
            name: Some("x".to_string()),
            email: Some("x@y.z".to_string()),
            provider: Some("bitbucket".to_string()),
            ..Default::default()
        };
        let err = cmd_add(&ctx, &mut p, args).unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn test_generate_key_saves_account() {
        let (_temp, ctx) = test_context();
        let mut p = Scripted::new(&["", "y", "octo"]);

        cmd_generate_key(&ctx, &mut p, "oss", "me@oss.dev", Some("gitlab"), None).unwrap();

        let acc = ctx.store.load().unwrap().find_by_name("oss").cloned().unwrap();
        assert_eq!(acc.provider.name, "gitlab");
        assert_eq!(acc.username, "octo");
        assert!(ctx.paths.ssh_dir.join("id_ed25519_gl_oss.pub").exists());
        assert!(ctx.ssh.has_host("gitlab.com-oss"));

        let mut again = Scripted::new(&[]);
        let err =
            cmd_generate_key(&ctx, &mut again, "oss", "me@oss.dev", Some("gitlab"), None)
                .unwrap_err();
        assert!(format!("{:#}", err).contains("already exists"));
    }

    #[test]
    fn test_use_global_sets_identity_and_current() {
        let (_temp, ctx) = test_context();
        seed(&ctx, &["a", "b"]);

        cmd_use(&ctx, "b", None, false).unwrap();

        assert_eq!(ctx.store.load().unwrap().current_account, "b");
        assert_eq!(
            ctx.git.get(Some(&Scope::Global), "user.name").as_deref(),
            Some("b-user")
        );
        assert_eq!(
            ctx.git.get(Some(&Scope::Global), "user.email").as_deref(),
            Some("b@example.com")
        );
    }

    #[test]
    fn test_use_local_leaves_current_alone() {
        let (temp, ctx) = test_context();
        seed(&ctx, &["a", "b"]);
        let repo = temp.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();

        cmd_use(&ctx, "b", Some(&repo), false).unwrap();

        assert_eq!(ctx.store.load().unwrap().current_account, "a");
        assert_eq!(
            ctx.git.get(Some(&Scope::Local(repo)), "user.email").as_deref(),
            Some("b@example.com")
        );
    }

    #[test]
    fn test_use_errors() {
        let (temp, ctx) = test_context();
        seed(&ctx, &["a"]);

        let err = cmd_use(&ctx, "a", Some(temp.path()), true).unwrap_err();
        assert!(err.to_string().contains("Cannot specify both"));

        let err = cmd_use(&ctx, "a", Some(temp.path()), false).unwrap_err();
        assert!(format!("{:#}", err).contains("not a git repository"));

        let err = cmd_use(&ctx, "ghost", None, false).unwrap_err();
        assert_eq!(err.to_string(), "Account 'ghost' not found. Available accounts: a");
    }

    #[test]
    fn test_config_directory() {
        let (temp, ctx) = test_context();
        seed(&ctx, &["work"]);
        let dir = temp.path().join("code").join("work");
        let mut p = Scripted::new(&[]);

        cmd_config(&ctx, &mut p, Some(&dir), Some("work")).unwrap();
        cmd_config(&ctx, &mut p, Some(&dir), Some("work")).unwrap();

        assert_eq!(
            fs::read_to_string(dir.join(".gitconfig")).unwrap(),
            "[user]\n\tname = work-user\n\temail = work@example.com\n"
        );
        let includes = ctx.global_git.list_conditional_includes();
        assert_eq!(includes.len(), 1);
        assert_eq!(includes[0].gitdir, format!("{}/", dir.display()));
    }

    #[test]
    fn test_config_directory_with_dot_components() {
        let (temp, ctx) = test_context();
        seed(&ctx, &["work"]);
        let dir = temp.path().join("work");
        let mut p = Scripted::new(&[]);

        cmd_config(&ctx, &mut p, Some(&dir.join(".")), Some("work")).unwrap();
        cmd_config(&ctx, &mut p, Some(&dir.join("sub").join("..")), Some("work")).unwrap();

        let includes = ctx.global_git.list_conditional_includes();
        assert_eq!(includes.len(), 1);
        assert_eq!(includes[0].gitdir, format!("{}/", dir.display()));
        assert_eq!(includes[0].path, dir.join(".gitconfig").display().to_string());
    }

    #[test]
    fn test_config_needs_both_arguments() {
        let (temp, ctx) = test_context();
        let mut p = Scripted::new(&[]);
        let err = cmd_config(&ctx, &mut p, Some(temp.path()), None).unwrap_err();
        assert!(err.to_string().contains("both directory and account"));
    }

    #[test]
    fn test_remove_with_keys() {
        let (_temp, ctx) = test_context();
        let mut p = Scripted::new(&["", "y", "octo"]);
        cmd_generate_key(&ctx, &mut p, "w", "w@x.y", None, None).unwrap();
        seed(&ctx, &["other"]);
        let key = ctx.paths.ssh_dir.join("id_ed25519_gh_w");
        assert!(key.exists());

        let mut p = Scripted::new(&["y", "y"]);
        cmd_remove(&ctx, &mut p, "w").unwrap();

        let config = ctx.store.load().unwrap();
        assert_eq!(config.list_names(), vec!["other"]);
        assert_eq!(config.current_account, "other");
        assert!(!key.exists());
        assert!(!ssh::public_key_path(&key).exists());
    }

    #[test]
    fn test_remove_notice_follows_current_pointer() {
        let (_temp, ctx) = test_context();
        seed(&ctx, &["a", "b", "c"]);

        let mut config = ctx.store.load().unwrap();
        for account in &mut config.accounts {
            account.is_default = false;
        }
        assert_eq!(config.current_account, "a");

        let (removed, notice) = remove_account(&mut config, "b").unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(notice, None);

        let (_, notice) = remove_account(&mut config, "a").unwrap();
        assert_eq!(notice.as_deref(), Some("Current account switched to 'c'"));

        let (_, notice) = remove_account(&mut config, "c").unwrap();
        assert_eq!(notice.as_deref(), Some("No current account"));
    }

    #[test]
    fn test_remove_cancelled() {
        let (_temp, ctx) = test_context();
        seed(&ctx, &["a"]);
        let mut p = Scripted::new(&[""]);
        cmd_remove(&ctx, &mut p, "a").unwrap();
        assert_eq!(ctx.store.load().unwrap().list_names(), vec!["a"]);
    }
}
