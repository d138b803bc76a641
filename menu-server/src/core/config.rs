use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、上传图片) |
/// | HTTP_PORT | 8000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志目录 (设置后按天滚动写文件) |
/// | BASE_URL | "" | 通知链接前缀 |
/// | NOTIFY_GROUP | admin_notifications | 员工通知广播组 |
/// | BROADCAST_CAPACITY | 256 | 每组广播缓冲 |
/// | PAGE_SIZE | 20 | 默认分页大小 |
/// | MAX_PAGE_SIZE | 100 | 最大分页大小 |
/// | ADMIN_USERNAME / ADMIN_PASSWORD | - | 首次启动时创建的员工账号 |
/// | JWT_SECRET / JWT_EXPIRATION_MINUTES / JWT_ISSUER / JWT_AUDIENCE | - | 见 [`JwtConfig`] |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/menu HTTP_PORT=8080 cargo run -p menu-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// HTTP 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// 通知 URL 前缀，如 `https://menu.example.com`
    pub base_url: String,
    /// 员工端订阅的广播组名
    pub notify_group: String,
    pub broadcast_capacity: usize,
    pub page_size: u32,
    pub max_page_size: u32,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
}

impl Config {
    /// 默认配置 (不读取环境变量)
    pub fn new(work_dir: impl Into<String>, jwt: JwtConfig) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port: 8000,
            environment: "development".into(),
            log_level: "info".into(),
            log_dir: None,
            base_url: String::new(),
            notify_group: "admin_notifications".into(),
            broadcast_capacity: crate::notify::channel::DEFAULT_CAPACITY,
            page_size: 20,
            max_page_size: 100,
            admin_username: None,
            admin_password: None,
            jwt,
        }
    }

    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> anyhow::Result<Self> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let jwt = JwtConfig::from_env(environment == "production")?;
        let defaults = Self::new(
            std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            jwt,
        );

        Ok(Self {
            http_port: env_parse("HTTP_PORT").unwrap_or(defaults.http_port),
            environment,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| defaults.log_level.clone()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            base_url: std::env::var("BASE_URL").unwrap_or_default(),
            notify_group: std::env::var("NOTIFY_GROUP")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| defaults.notify_group.clone()),
            broadcast_capacity: env_parse("BROADCAST_CAPACITY").unwrap_or(defaults.broadcast_capacity),
            page_size: env_parse("PAGE_SIZE").unwrap_or(defaults.page_size),
            max_page_size: env_parse("MAX_PAGE_SIZE").unwrap_or(defaults.max_page_size),
            admin_username: std::env::var("ADMIN_USERNAME").ok().filter(|s| !s.is_empty()),
            admin_password: std::env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
            ..defaults
        })
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// SQLite 数据库文件路径
    pub fn database_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("menu.db")
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
