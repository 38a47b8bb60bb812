//! Task watchdog for the main loop.
//!
//! The dispatcher loop subscribes itself to the ESP-IDF task watchdog and
//! must call [`Watchdog::feed`] every iteration.  A recalibration or a
//! stalled UART write that outlives the timeout resets the board.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::{
    ESP_OK, esp_task_wdt_add, esp_task_wdt_config_t, esp_task_wdt_reconfigure, esp_task_wdt_reset,
};
use log::{info, warn};

pub struct Watchdog {
    subscribed: bool,
    feeds: u32,
}

impl Watchdog {
    /// Reconfigure the task watchdog and subscribe the calling task.
    /// Failure leaves the loop unsupervised but running.
    pub fn subscribe(timeout_ms: u32) -> Self {
        let subscribed = Self::subscribe_current_task(timeout_ms);
        if subscribed {
            info!("Watchdog armed: {} ms", timeout_ms);
        } else {
            warn!("Watchdog not armed; main loop is unsupervised");
        }
        Self {
            subscribed,
            feeds: 0,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.subscribed
    }

    /// Feeds since subscription, wrapping.
    pub fn feeds(&self) -> u32 {
        self.feeds
    }

    pub fn feed(&mut self) {
        self.feeds = self.feeds.wrapping_add(1);
        if self.subscribed {
            Self::reset_timer();
        }
    }

    #[cfg(target_os = "espidf")]
    fn subscribe_current_task(timeout_ms: u32) -> bool {
        let cfg = esp_task_wdt_config_t {
            timeout_ms,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // SAFETY: plain ESP-IDF calls; a null handle means the calling task.
        unsafe {
            let ret = esp_task_wdt_reconfigure(&cfg);
            if ret != ESP_OK {
                warn!("esp_task_wdt_reconfigure returned {}", ret);
            }
            esp_task_wdt_add(core::ptr::null_mut()) == ESP_OK
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn subscribe_current_task(_timeout_ms: u32) -> bool {
        false
    }

    #[cfg(target_os = "espidf")]
    fn reset_timer() {
        // SAFETY: only reached after a successful esp_task_wdt_add.
        unsafe {
            esp_task_wdt_reset();
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn reset_timer() {}
}
