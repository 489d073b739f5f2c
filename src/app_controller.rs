use log::{debug, info};
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::Arc;

use crate::app_config::{Config, FallbackProvider};
use crate::errors::AppError;
use crate::providers::{GoogleTranslateProvider, OpenAIProvider, Provider};
use crate::translation::{
    GlossaryCache, GlossarySource, ProviderOrchestrator, TranslationResult, TranslationService,
    TranslationSettings,
};

// @module: Application controller wiring configuration, glossary and providers

/// Orchestrator built for a specific ordered provider set
struct CachedOrchestrator {
    generation: u64,
    names: Vec<String>,
    orchestrator: Arc<ProviderOrchestrator>,
}

/// Configuration together with its reload generation
struct ConfigState {
    config: Config,
    generation: u64,
}

/// Providers built from one configuration generation, in priority order
pub struct ProviderSet {
    generation: u64,
    providers: Vec<Arc<dyn Provider>>,
}

impl ProviderSet {
    /// Provider names in priority order
    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// The providers themselves
    pub fn providers(&self) -> &[Arc<dyn Provider>] {
        &self.providers
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Per-process service registry
///
/// Built once by the caller and shared; there is no global instance.
pub struct Controller {
    // @field: Current configuration and its generation, bumped on reload
    state: RwLock<ConfigState>,

    // @field: Glossary snapshot cache shared by every translation
    glossary: Arc<GlossaryCache>,

    // @field: Orchestrator reused while generation and provider set are unchanged
    cached: Mutex<Option<CachedOrchestrator>>,
}

impl Controller {
    /// Create a controller after validating `config`
    pub fn new(config: Config, glossary_source: Arc<dyn GlossarySource>) -> Result<Self, AppError> {
        config.validate().map_err(config_error)?;
        let glossary = Arc::new(GlossaryCache::new(glossary_source, config.glossary_cache_ttl()));

        Ok(Self {
            state: RwLock::new(ConfigState { config, generation: 0 }),
            glossary,
            cached: Mutex::new(None),
        })
    }

    /// Load a JSON config file, apply `LEO_*` overrides and create the controller
    pub fn from_config_file<P: AsRef<Path>>(
        path: P,
        glossary_source: Arc<dyn GlossarySource>,
    ) -> Result<Self, AppError> {
        let mut config = Config::from_file(path).map_err(config_error)?;
        config.apply_env_overrides().map_err(config_error)?;
        Self::new(config, glossary_source)
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> Config {
        self.state.read().config.clone()
    }

    /// Replace the configuration and drop the cached orchestrator
    ///
    /// Provider sets built before the reload are never cached afterwards.
    pub fn reload_config(&self, config: Config) -> Result<(), AppError> {
        config.validate().map_err(config_error)?;
        {
            let mut state = self.state.write();
            state.config = config;
            state.generation += 1;
        }
        *self.cached.lock() = None;
        info!("Configuration reloaded");
        Ok(())
    }

    /// Build every provider whose credentials are present, in priority order
    pub fn build_providers(&self) -> ProviderSet {
        let state = self.state.read();
        let config = &state.config;
        let mut providers: Vec<Arc<dyn Provider>> = Vec::new();

        match OpenAIProvider::from_config(&config.openai) {
            Ok(provider) => providers.push(Arc::new(provider)),
            Err(e) => debug!("Skipping OpenAI provider: {}", e),
        }

        match config.fallback_provider {
            FallbackProvider::GoogleTranslate => {
                match GoogleTranslateProvider::from_config(&config.google_translate) {
                    Ok(provider) => providers.push(Arc::new(provider)),
                    Err(e) => debug!("Skipping Google Translate provider: {}", e),
                }
            }
            FallbackProvider::Disabled => debug!("Fallback provider disabled"),
        }

        ProviderSet {
            generation: state.generation,
            providers,
        }
    }

    /// Wrap caller-supplied providers as a set of the current generation
    pub fn provider_set(&self, providers: Vec<Arc<dyn Provider>>) -> ProviderSet {
        ProviderSet {
            generation: self.state.read().generation,
            providers,
        }
    }

    /// Orchestrator for the providers the configuration currently allows
    pub fn orchestrator(&self) -> Option<Arc<ProviderOrchestrator>> {
        self.orchestrator_with(self.build_providers())
    }

    /// Orchestrator for `set`, reusing the cached one when the generation and
    /// the ordered provider names are unchanged
    ///
    /// A set from an older generation gets a fresh orchestrator that is not cached.
    pub fn orchestrator_with(&self, set: ProviderSet) -> Option<Arc<ProviderOrchestrator>> {
        if set.is_empty() {
            return None;
        }

        let names = set.names();
        let mut cached = self.cached.lock();
        let state = self.state.read();
        let policy = state.config.retry_policy();

        if set.generation != state.generation {
            debug!(
                "Provider set from generation {} is stale (current {}), not caching",
                set.generation, state.generation
            );
            return Some(Arc::new(ProviderOrchestrator::new(set.providers, policy)));
        }

        if let Some(current) = cached
            .as_ref()
            .filter(|c| c.generation == state.generation && c.names == names)
        {
            return Some(Arc::clone(&current.orchestrator));
        }

        debug!("Building orchestrator for providers [{}]", names.join(", "));
        let orchestrator = Arc::new(ProviderOrchestrator::new(set.providers, policy));
        *cached = Some(CachedOrchestrator {
            generation: state.generation,
            names,
            orchestrator: Arc::clone(&orchestrator),
        });
        Some(orchestrator)
    }

    /// Shared glossary cache
    pub fn glossary_cache(&self) -> Arc<GlossaryCache> {
        Arc::clone(&self.glossary)
    }

    /// Drop the glossary snapshot and reload it, returning the term count
    pub async fn refresh_glossary(&self) -> Result<usize, AppError> {
        self.glossary.invalidate().await;
        Ok(self.glossary.entries().await?.len())
    }

    /// Translation service wired with the current configuration
    pub fn translation_service(&self) -> TranslationService {
        let settings = TranslationSettings::from(&self.state.read().config);
        let service = TranslationService::new(settings).with_glossary(self.glossary_cache());

        match self.orchestrator() {
            Some(orchestrator) => service.with_orchestrator(orchestrator),
            None => service,
        }
    }

    /// Translate `text` with the current configuration
    pub async fn translate(
        &self,
        text: &str,
        tone: Option<&str>,
        audience: Option<&str>,
        channel: Option<&str>,
    ) -> TranslationResult {
        self.translation_service().translate(text, tone, audience, channel).await
    }
}

fn config_error(error: anyhow::Error) -> AppError {
    AppError::Config(format!("{:#}", error))
}
