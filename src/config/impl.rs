use std::path::Path;

use super::StaticConfig;
use crate::errors::{Result, ShortpathError};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// `url_mappings.short_path` 的列宽
pub const MAX_SHORT_PATH_LENGTH: usize = 50;

/// 示例配置中附加在对应键之前的说明
const SAMPLE_NOTES: &[(&str, &str)] = &[
    (
        "password",
        "# Empty password disables /translate and /api (they answer 404)",
    ),
    (
        "max_tracked_clients",
        "# Sweep trigger, not a hard cap: expired windows are purged at most once per window",
    ),
    (
        "client_ip_header",
        "# Header carrying the real client IP, set by the CDN in front of the server",
    ),
    (
        "trusted_proxies",
        "# Peers (IP or CIDR) allowed to set client_ip_header. When empty, the header is\n\
         # trusted from every peer and a direct client can rotate it to evade the rate\n\
         # limit. Leave empty only when all traffic passes through the CDN.",
    ),
    (
        "max_path_length",
        "# At most 50, the width of the short_path column",
    ),
];

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML 文件 > 默认值
    /// ENV 前缀：SP，分隔符：__
    /// 示例：SP__SERVER__PORT=9999、SP__ADMIN__PASSWORD=secret
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SP")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("validation.blacklisted_domains")
                    .with_list_parse_key("validation.dangerous_keywords")
                    .with_list_parse_key("rate_limit.trusted_proxies"),
            )
            .build()?;

        let config: StaticConfig = settings.try_deserialize()?;
        if Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }

        config.validate()?;
        Ok(config)
    }

    /// 检查配置取值是否自洽
    pub fn validate(&self) -> Result<()> {
        if self.rate_limit.max_requests == 0 {
            return Err(ShortpathError::config(
                "rate_limit.max_requests must be greater than 0",
            ));
        }
        if self.rate_limit.window_size_seconds == 0 {
            return Err(ShortpathError::config(
                "rate_limit.window_size_seconds must be greater than 0",
            ));
        }
        if self.allocator.max_path_length == 0
            || self.allocator.max_path_length > MAX_SHORT_PATH_LENGTH
        {
            return Err(ShortpathError::config(format!(
                "allocator.max_path_length must be between 1 and {}",
                MAX_SHORT_PATH_LENGTH
            )));
        }
        if self.validation.max_url_length == 0 {
            return Err(ShortpathError::config(
                "validation.max_url_length must be greater than 0",
            ));
        }
        if let Some(ref public_url) = self.server.public_url
            && url::Url::parse(public_url).is_err()
        {
            return Err(ShortpathError::config(format!(
                "server.public_url is not a valid URL: {}",
                public_url
            )));
        }
        Ok(())
    }

    /// 是否启用管理接口
    pub fn admin_enabled(&self) -> bool {
        !self.admin.password.is_empty()
    }

    /// 生成带注释的示例 TOML 配置
    pub fn generate_sample_config() -> Result<String> {
        let rendered = toml::to_string_pretty(&Self::default())
            .map_err(|e| ShortpathError::serialization(e.to_string()))?;

        let mut sample = String::with_capacity(rendered.len() + 1024);
        sample.push_str("# shortpath configuration\n");
        sample.push_str("# Every key can be overridden from the environment, e.g. SP__SERVER__PORT=9000\n\n");
        for line in rendered.lines() {
            let key = line.split('=').next().unwrap_or_default().trim();
            if let Some((_, note)) = SAMPLE_NOTES.iter().find(|(name, _)| *name == key) {
                sample.push_str(note);
                sample.push('\n');
            }
            sample.push_str(line);
            sample.push('\n');
        }
        Ok(sample)
    }

    /// 写出带注释的示例配置
    pub fn save_sample_to_file<P: AsRef<Path>>(path: P) -> Result<()> {
        let content = Self::generate_sample_config()?;
        write_with_parents(path.as_ref(), &content)
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ShortpathError::serialization(e.to_string()))?;
        write_with_parents(path.as_ref(), &content)
    }
}

fn write_with_parents(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, content)?;
    Ok(())
}
