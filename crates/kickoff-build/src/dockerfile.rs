use kickoff_core::config::{is_valid_env_key, is_valid_env_value};
use kickoff_core::{BuildConfig, ServerConfig};

/// Variables owned by the generator; `build.env` entries with these keys are dropped.
const RESERVED_ENV: [&str; 2] = ["APP_HOME", "PORT"];

/// Generates a multi-stage Dockerfile that runs the service as a non-root user.
pub struct DockerfileGenerator<'a> {
    config: &'a BuildConfig,
    server: &'a ServerConfig,
    binary: &'a str,
}

impl<'a> DockerfileGenerator<'a> {
    pub fn new(config: &'a BuildConfig, server: &'a ServerConfig, binary: &'a str) -> Self {
        Self {
            config,
            server,
            binary,
        }
    }

    pub fn render(&self) -> String {
        let build_packages = if self.config.extra_packages.is_empty() {
            String::new()
        } else {
            format!("{}\n", apt_install(&self.config.extra_packages))
        };

        let mut runtime_packages = vec!["ca-certificates".to_owned()];
        runtime_packages.extend(self.config.extra_packages.iter().cloned());

        format!(
            r#"# === Base: cargo-chef installed once ===
FROM {base} AS chef
RUN cargo install cargo-chef --version {chef_version} --locked
WORKDIR /build

# === Stage 1: Planner ===
FROM chef AS planner
COPY . .
RUN cargo chef prepare --recipe-path recipe.json

# === Stage 2: Cacher (dependency build) ===
FROM chef AS cacher
{build_packages}COPY --from=planner /build/recipe.json recipe.json
RUN cargo chef cook --release --recipe-path recipe.json

# === Stage 3: Builder ===
FROM chef AS builder
{build_packages}COPY --from=cacher /build/target target
COPY --from=cacher /usr/local/cargo /usr/local/cargo
COPY . .
RUN cargo build --release --bin {binary}

# === Stage 4: Runtime ===
FROM {runtime}
{runtime_install}
RUN groupadd --system --gid {uid} {user} \
    && useradd --system --uid {uid} --gid {uid} --home-dir {app_home} --no-create-home --shell /usr/sbin/nologin {user} \
    && mkdir -p {app_home} \
    && chown {user}:{user} {app_home}
{env}WORKDIR $APP_HOME
COPY --from=builder --chown={user}:{user} /build/target/release/{binary} /usr/local/bin/{binary}
USER {user}
EXPOSE {port}
CMD ["/usr/local/bin/{binary}", "serve"]
"#,
            base = self.config.base_image,
            chef_version = self.config.cargo_chef_version,
            runtime = self.config.runtime_image,
            runtime_install = apt_install(&runtime_packages),
            binary = self.binary,
            user = self.config.user,
            uid = self.config.uid,
            app_home = self.server.app_home,
            port = self.server.port,
            env = self.env_directives(),
            build_packages = build_packages,
        )
    }

    /// ENV lines for the runtime stage, deterministic across renders.
    fn env_directives(&self) -> String {
        let mut lines = vec![
            env_line("APP_HOME", &self.server.app_home),
            env_line("PORT", &self.server.port.to_string()),
        ];

        if !self.config.env.contains_key("RUST_LOG") {
            lines.push(env_line("RUST_LOG", "info"));
        }

        let mut keys: Vec<&String> = self.config.env.keys().collect();
        keys.sort();
        for key in keys {
            if RESERVED_ENV.contains(&key.as_str()) {
                tracing::warn!(
                    key = %key,
                    "ignoring build.env entry; set it through [server] instead"
                );
                continue;
            }
            let value = &self.config.env[key];
            if !is_valid_env_key(key) || !is_valid_env_value(value) {
                tracing::warn!(
                    key = %key.escape_debug(),
                    "ignoring build.env entry with an invalid name or control characters"
                );
                continue;
            }
            lines.push(env_line(key, value));
        }

        lines.iter().map(|l| format!("{l}\n")).collect()
    }
}

fn apt_install(packages: &[String]) -> String {
    format!(
        "RUN apt-get update && apt-get install -y --no-install-recommends {} && rm -rf /var/lib/apt/lists/*",
        packages.join(" ")
    )
}

fn env_line(key: &str, value: &str) -> String {
    format!("ENV {key}={}", quote_env_value(value))
}

/// Quote a value for an `ENV key=value` directive when it is not a bare word.
fn quote_env_value(value: &str) -> String {
    let bare = !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '$'));
    if bare {
        return value.to_owned();
    }
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$");
    format!("\"{escaped}\"")
}
