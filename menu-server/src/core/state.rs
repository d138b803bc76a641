use std::path::PathBuf;
use std::sync::Arc;

use shared::models::ITEM_IMAGE_DIR;
use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::staff;
use crate::notify::{ChannelLayer, NotificationService};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc / 连接池句柄实现浅拷贝，每个请求 clone 一份。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Arc<Config> | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | channels | ChannelLayer | 命名组广播 |
/// | notifier | NotificationService | 订单转换通知 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub channels: ChannelLayer,
    pub notifier: NotificationService,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 创建工作目录和图片目录
    /// 2. 打开数据库并执行迁移
    /// 3. 首次启动时创建员工账号
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let work_dir = PathBuf::from(&config.work_dir);
        tokio::fs::create_dir_all(work_dir.join(ITEM_IMAGE_DIR)).await?;

        let db_path = config.database_path();
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        let state = Self::with_db(config.clone(), db);
        state.seed_admin().await?;
        Ok(state)
    }

    /// 使用已打开的数据库组装状态 (测试用 in-memory 数据库)
    pub fn with_db(config: Config, db: DbService) -> Self {
        let channels = ChannelLayer::new(config.broadcast_capacity);
        let notifier = NotificationService::new(
            db.pool.clone(),
            channels.clone(),
            config.notify_group.clone(),
            config.base_url.clone(),
        );
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config: Arc::new(config),
            db,
            jwt_service,
            channels,
            notifier,
        }
    }

    /// 员工表为空且配置了 ADMIN_USERNAME / ADMIN_PASSWORD 时创建账号
    pub async fn seed_admin(&self) -> anyhow::Result<()> {
        if staff::count(self.pool()).await? > 0 {
            return Ok(());
        }

        match (&self.config.admin_username, &self.config.admin_password) {
            (Some(username), Some(password)) => {
                staff::create(self.pool(), username, password).await?;
                tracing::info!(username = %username, "Initial staff account created");
            }
            _ => {
                tracing::warn!("No staff accounts exist; set ADMIN_USERNAME and ADMIN_PASSWORD to create one");
            }
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// 上传的菜品图片目录
    pub fn item_image_dir(&self) -> PathBuf {
        self.work_dir().join(ITEM_IMAGE_DIR)
    }

    /// 分页参数 → `(page, per_page, offset)`
    pub fn page_window(&self, page: Option<u32>, per_page: Option<u32>) -> (u32, u32, i64) {
        shared::util::page_window(page, per_page, self.config.page_size, self.config.max_page_size)
    }

    /// 启动后台任务
    pub fn start_background_tasks(&self) {
        let channels = self.channels.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
            loop {
                interval.tick().await;
                let pruned = channels.prune();
                if pruned > 0 {
                    tracing::debug!(pruned, "Pruned idle broadcast groups");
                }
            }
        });
    }
}
