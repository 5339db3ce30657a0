//! Runtime configuration, read from flags or the environment (`.env` is
//! loaded first by the binary).

use chrono::Duration;
use clap::Parser;

use crate::moves::chess_move::PromotionPolicy;

#[derive(Debug, Clone, Parser)]
#[command(name = "lvl_chess", version, about = "Verified chess sessions over a line protocol")]
pub struct AppConfig {
    /// Bot token shared with the host platform; signs `initData`.
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: String,

    /// Oldest accepted `auth_date`, in seconds.
    #[arg(long, env = "AUTH_MAX_AGE_SECS", default_value_t = 86_400)]
    pub auth_max_age_secs: u32,

    /// Reject promotions that do not name a piece instead of picking a queen.
    #[arg(long, env = "STRICT_PROMOTION", default_value_t = false)]
    pub strict_promotion: bool,

    /// Echoed as `game_id` on every outbound move.
    #[arg(long, env = "GAME_ID")]
    pub game_id: Option<String>,

    #[arg(long, env = "LOG_FILTER", default_value = "info")]
    pub log_filter: String,
}

impl AppConfig {
    pub fn max_age(&self) -> Duration {
        Duration::seconds(i64::from(self.auth_max_age_secs))
    }

    pub fn promotion_policy(&self) -> PromotionPolicy {
        if self.strict_promotion {
            PromotionPolicy::Strict
        } else {
            PromotionPolicy::DefaultToQueen
        }
    }
}
