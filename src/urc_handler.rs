use embedded_io::Write;
use heapless::Deque;

use crate::client::Device;
use crate::command::clock::types::{AlarmIndex, ALARM_COUNT};
use crate::command::sms::responses::{Sms, SmsReader};
use crate::command::sms::ReadMessage;
use crate::command::Urc;
use crate::config::ModemConfig;
use crate::fmt::Bytes;
use crate::ingress::Line;

/// Message arrivals held back until the command they interrupted completed.
const MAX_DEFERRED_SMS: usize = 4;

#[derive(Clone, Copy)]
pub(crate) enum AlarmSlot {
    Unarmed,
    Armed(fn(u8)),
}

/// Application callbacks, plus arrivals waiting to be fetched.
pub(crate) struct Callbacks {
    on_sms: Option<fn(Sms)>,
    alarms: [AlarmSlot; ALARM_COUNT as usize],
    deferred_sms: Deque<u8, MAX_DEFERRED_SMS>,
}

impl Callbacks {
    pub(crate) const fn new() -> Self {
        Self {
            on_sms: None,
            alarms: [AlarmSlot::Unarmed; ALARM_COUNT as usize],
            deferred_sms: Deque::new(),
        }
    }

    pub(crate) fn arm(&mut self, index: AlarmIndex, cb: fn(u8)) {
        self.alarms[index.slot()] = AlarmSlot::Armed(cb);
    }

    pub(crate) fn disarm(&mut self, index: AlarmIndex) {
        self.alarms[index.slot()] = AlarmSlot::Unarmed;
    }

    pub(crate) fn is_armed(&self, index: AlarmIndex) -> bool {
        matches!(self.alarms[index.slot()], AlarmSlot::Armed(_))
    }
}

impl<'a, T: Write, C: ModemConfig, const N: usize> Device<'a, T, C, N> {
    /// Registers the function called with every message announced by `+CMTI`.
    ///
    /// Requires new message indications, see
    /// [`enable_new_message_indications`](Self::enable_new_message_indications).
    pub fn set_sms_callback(&mut self, cb: fn(Sms)) {
        self.callbacks.on_sms = Some(cb);
    }

    /// Returns `true` if `line` is an unsolicited notification, which has
    /// then been consumed.
    ///
    /// Alarms are dispatched right away. A new message is read from storage
    /// and handed to the message callback, once no command is outstanding.
    pub fn classify_and_dispatch(&mut self, line: &[u8]) -> bool {
        let urc = match Urc::classify(line) {
            Ok(Some(urc)) => urc,
            Ok(None) => return false,
            Err(_) => {
                warn!("Dropping malformed notification: {:?}", Bytes(line));
                return true;
            }
        };

        debug!("Notification: {:?}", urc);
        match urc {
            Urc::AlarmTriggered(alarm) => self.dispatch_alarm(alarm.index),
            Urc::NewMessageIndication(msg) => {
                if self.is_busy() {
                    if self.callbacks.deferred_sms.push_back(msg.index).is_err() {
                        warn!("Too many pending arrivals, dropping message {}", msg.index);
                    }
                } else {
                    self.fetch_and_dispatch(msg.index);
                }
            }
        }
        true
    }

    fn dispatch_alarm(&mut self, index: u8) {
        let slot = AlarmIndex::try_from(index).map(|i| self.callbacks.alarms[i.slot()]);
        match slot {
            Ok(AlarmSlot::Armed(cb)) => cb(index),
            Ok(AlarmSlot::Unarmed) => warn!("Alarm {} fired but is not armed", index),
            Err(_) => warn!("Alarm index {} out of range", index),
        }
    }

    /// Fetches every message whose arrival was announced while a command was
    /// outstanding. Arrivals announced during a fetch are queued and handled
    /// by the same loop.
    pub(crate) fn deliver_deferred(&mut self) {
        while let Some(index) = self.callbacks.deferred_sms.pop_front() {
            self.fetch_and_dispatch(index);
        }
    }

    fn fetch_and_dispatch(&mut self, index: u8) {
        let Some(cb) = self.callbacks.on_sms else {
            debug!("No message callback, leaving message {} in storage", index);
            return;
        };
        if !self.sms_setup.is_ready() {
            warn!("Text mode not set up, leaving message {} in storage", index);
            return;
        }

        let mut sms = None;
        let mut store = |s: Sms| sms = Some(s);
        let mut reader = SmsReader::read(index);
        let fetched = self.send_streaming(&ReadMessage { index }, &mut |line: &Line| {
            reader.feed(line, &mut store)
        });
        let res = fetched.and_then(|()| reader.finish(&mut store));

        match (res, sms) {
            (Ok(_), Some(sms)) => cb(sms),
            (Ok(_), None) => warn!("Message {} not found in storage", index),
            (Err(e), _) => warn!("Failed to read message {}: {:?}", index, e),
        }
    }
}
