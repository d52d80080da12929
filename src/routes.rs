//! Static route table.
//!
//! The first argument selects a route; every token not in `ROUTES` falls
//! through to `RouteKind::Passthrough` so native compose commands (`up -d`,
//! `logs -f`, ...) work unchanged. Matching is exact and case-sensitive.

/// Which compose service a route execs into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    App,
    Database,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Help,
    Install,
    Init,
    /// `exec <service> <prefix..> <args[forward_from..]>`
    Exec {
        service: Service,
        prefix: &'static [&'static str],
        forward_from: usize,
    },
    /// psql one-liner in the database service.
    DatabaseClient,
    /// `postgres [shell|bash|<command>..]`
    DatabaseExec,
    Passthrough,
}

const NUXI: &[&str] = &["npx", "nuxi"];
const NUXI_BUILD: &[&str] = &["npx", "nuxi", "build"];
const SHELL: &[&str] = &["/bin/sh"];

/// nuxi subcommands proxied with the verb kept.
const NUXI_VERB: RouteKind = RouteKind::Exec {
    service: Service::App,
    prefix: NUXI,
    forward_from: 0,
};

/// Binaries run by name in the app service.
const APP_BINARY: RouteKind = RouteKind::Exec {
    service: Service::App,
    prefix: &[],
    forward_from: 0,
};

const APP_SHELL: RouteKind = RouteKind::Exec {
    service: Service::App,
    prefix: SHELL,
    forward_from: 1,
};

pub static ROUTES: &[(&str, RouteKind)] = &[
    ("help", RouteKind::Help),
    ("install", RouteKind::Install),
    ("init", RouteKind::Init),
    ("add", NUXI_VERB),
    ("analyze", NUXI_VERB),
    ("build-module", NUXI_VERB),
    ("cleanup", NUXI_VERB),
    ("dev", NUXI_VERB),
    ("devtools", NUXI_VERB),
    ("generate", NUXI_VERB),
    ("info", NUXI_VERB),
    ("prepare", NUXI_VERB),
    ("preview", NUXI_VERB),
    ("typecheck", NUXI_VERB),
    ("upgrade", NUXI_VERB),
    // `build` belongs to compose, so nuxi's build gets an alias.
    (
        "nuxi-build",
        RouteKind::Exec {
            service: Service::App,
            prefix: NUXI_BUILD,
            forward_from: 1,
        },
    ),
    (
        "nuxi",
        RouteKind::Exec {
            service: Service::App,
            prefix: NUXI,
            forward_from: 1,
        },
    ),
    ("nuxt", APP_BINARY),
    ("node", APP_BINARY),
    ("npm", APP_BINARY),
    ("npx", APP_BINARY),
    ("yarn", APP_BINARY),
    ("pnpm", APP_BINARY),
    ("pnpx", APP_BINARY),
    ("bun", APP_BINARY),
    ("bunx", APP_BINARY),
    ("psql", RouteKind::DatabaseClient),
    ("shell", APP_SHELL),
    ("bash", APP_SHELL),
    ("postgres", RouteKind::DatabaseExec),
];

/// Sub-verbs of `postgres` that open a shell.
pub const SHELL_VERBS: &[&str] = &["shell", "bash"];

/// Default directory created by `init`.
pub const DEFAULT_INIT_DIRECTORY: &str = "nuxt-app";

pub fn lookup(token: &str) -> RouteKind {
    ROUTES
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, kind)| *kind)
        .unwrap_or(RouteKind::Passthrough)
}

/// What a compose invocation should do inside the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// `exec <service> <command..>`
    Exec { service: Service, command: Vec<String> },
    /// psql in the database service; `extra` is appended to the one-liner.
    DatabaseClient { extra: Vec<String> },
    /// Arguments handed to compose as-is.
    Passthrough(Vec<String>),
}

impl Target {
    /// Only passthrough may run against a stopped environment.
    pub fn requires_liveness(&self) -> bool {
        !matches!(self, Target::Passthrough(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// No arguments at all.
    Usage,
    Help,
    Install,
    Init { directory: String },
    Compose(Target),
}

/// Decide what `args` (program name already stripped) should do.
pub fn plan(args: &[String]) -> Plan {
    let Some(verb) = args.first() else {
        return Plan::Usage;
    };

    match lookup(verb) {
        RouteKind::Help => Plan::Help,
        RouteKind::Install => Plan::Install,
        RouteKind::Init => Plan::Init {
            directory: args
                .get(1)
                .cloned()
                .unwrap_or_else(|| DEFAULT_INIT_DIRECTORY.to_string()),
        },
        RouteKind::Exec {
            service,
            prefix,
            forward_from,
        } => {
            let command = prefix
                .iter()
                .map(|s| s.to_string())
                .chain(args.iter().skip(forward_from).cloned())
                .collect();
            Plan::Compose(Target::Exec { service, command })
        }
        RouteKind::DatabaseClient => Plan::Compose(Target::DatabaseClient {
            extra: args[1..].to_vec(),
        }),
        RouteKind::DatabaseExec => {
            let rest = &args[1..];
            let command = match rest.first() {
                Some(sub) if SHELL_VERBS.contains(&sub.as_str()) => SHELL
                    .iter()
                    .map(|s| s.to_string())
                    .chain(rest[1..].iter().cloned())
                    .collect(),
                _ => rest.to_vec(),
            };
            Plan::Compose(Target::Exec {
                service: Service::Database,
                command,
            })
        }
        RouteKind::Passthrough => Plan::Compose(Target::Passthrough(args.to_vec())),
    }
}
