//! Zeitquelle fuer die Token-Pruefung
//!
//! Der Token-Service liest die aktuelle Zeit ausschliesslich ueber [`Uhr`],
//! damit Ablauftests ohne echtes Warten auskommen.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Liefert die aktuelle Zeit
pub trait Uhr: Send + Sync + std::fmt::Debug {
    fn jetzt(&self) -> DateTime<Utc>;
}

/// Systemuhr
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemUhr;

impl Uhr for SystemUhr {
    fn jetzt(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Einstellbare Uhr mit Sekundenaufloesung
#[derive(Debug)]
pub struct FesteUhr {
    sekunden: AtomicI64,
}

impl FesteUhr {
    pub fn neu(zeitpunkt: DateTime<Utc>) -> Self {
        Self {
            sekunden: AtomicI64::new(zeitpunkt.timestamp()),
        }
    }

    pub fn setzen(&self, zeitpunkt: DateTime<Utc>) {
        self.sekunden.store(zeitpunkt.timestamp(), Ordering::SeqCst);
    }

    /// Stellt die Uhr um `dauer` vor (ganze Sekunden)
    pub fn vorspulen(&self, dauer: Duration) {
        self.sekunden.fetch_add(dauer.num_seconds(), Ordering::SeqCst);
    }
}

impl Uhr for FesteUhr {
    fn jetzt(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.sekunden.load(Ordering::SeqCst), 0)
            .single()
            .unwrap_or_default()
    }
}
