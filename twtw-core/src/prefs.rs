// File: twtw-core/src/prefs.rs

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use twtw_common::models::{PREF_PREFIX, PrefKey, parse_flag};
use twtw_common::traits::Host;
use crate::Error;

/// Typed access to the plugin's namespaced preferences, persisted by the host.
#[derive(Clone)]
pub struct PreferenceStore {
    host: Arc<dyn Host>,
}

impl PreferenceStore {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self { host }
    }

    /// Seeds every key that the host has no value for. Returns how many keys
    /// were written.
    pub fn init_defaults(&self) -> Result<usize, Error> {
        let mut seeded = 0;
        for key in PrefKey::ALL {
            if self.host.get_pref(&key.storage_key()).is_none() {
                self.set(key, key.default_value())?;
                seeded += 1;
            }
        }
        if seeded > 0 {
            info!("Seeded {} preference default(s).", seeded);
        }
        Ok(seeded)
    }

    /// Current value, or the key's default if the host lost it.
    pub fn get(&self, key: PrefKey) -> String {
        self.host
            .get_pref(&key.storage_key())
            .unwrap_or_else(|| key.default_value().to_string())
    }

    pub fn set(&self, key: PrefKey, value: &str) -> Result<(), Error> {
        debug!("Setting preference {} = {:?}", key, value);
        if self.host.set_pref(&key.storage_key(), value) {
            Ok(())
        } else {
            Err(Error::Host(format!("host refused to store preference '{}'", key)))
        }
    }

    pub fn flag(&self, key: PrefKey) -> bool {
        parse_flag(&self.get(key))
    }

    /// Delay between the end of one refresh cycle and the start of the next.
    pub fn refresh_interval(&self) -> Duration {
        let raw = self.get(PrefKey::RefreshRate);
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!("Invalid refresh_rate {:?}; using the default.", raw);
                let secs = PrefKey::RefreshRate
                    .default_value()
                    .parse::<u64>()
                    .unwrap_or(600);
                Duration::from_secs(secs)
            }
        }
    }

    /// Every stored preference carrying our prefix, with the prefix removed,
    /// in the order the host lists them.
    pub fn list(&self) -> Vec<(String, String)> {
        self.host
            .list_prefs()
            .into_iter()
            .filter_map(|full_key| {
                let short = full_key.strip_prefix(PREF_PREFIX)?.to_string();
                let value = self.host.get_pref(&full_key).unwrap_or_default();
                Some((short, value))
            })
            .collect()
    }
}
