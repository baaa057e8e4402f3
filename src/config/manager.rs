//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    ParitySettings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: ParitySettings,

    /// プロジェクトのルートパス
    project_root: PathBuf,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new(project_root: PathBuf) -> Self {
        Self { current_settings: ParitySettings::default(), project_root }
    }

    /// 設定を読み込む
    ///
    /// 設定ファイルがなければデフォルト値を使う
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for project: {:?}", self.project_root);

        let settings = loader::load_from_project(&self.project_root)?.map_or_else(
            ParitySettings::default,
            |settings| {
                tracing::debug!("Loaded project settings: {:?}", settings);
                settings
            },
        );

        self.update_settings(settings)
    }

    /// 設定を更新する
    ///
    /// # Errors
    /// バリデーションエラー
    pub fn update_settings(&mut self, new_settings: ParitySettings) -> Result<(), ConfigError> {
        // バリデーション
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &ParitySettings {
        &self.current_settings
    }

    /// プロジェクトルートを取得
    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}
