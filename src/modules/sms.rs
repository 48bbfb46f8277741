use embedded_io::Write;

use crate::client::Device;
use crate::command::sms::responses::{Sms, SmsReader};
use crate::command::sms::types::{
    DeleteFlag, MessageFormat, MessageStatus, MessageStorage, NewMessageIndicationMode,
};
use crate::command::sms::{
    DeleteAllMessages, DeleteMessage, ListMessages, SendMessage, SetMessageFormat,
    SetNewMessageIndication, SetPreferredStorage,
};
use crate::config::ModemConfig;
use crate::error::Error;
use crate::ingress::Line;

impl<'a, T: Write, C: ModemConfig, const N: usize> Device<'a, T, C, N> {
    pub fn set_sms_format_to_text(&mut self) -> Result<(), Error> {
        self.send(&SetMessageFormat {
            format: MessageFormat::Text,
        })?;
        self.sms_setup.text_mode = true;
        Ok(())
    }

    /// Reads, writes and receives messages in SIM card storage.
    pub fn use_sim_card_for_sms_storage(&mut self) -> Result<(), Error> {
        self.send(&SetPreferredStorage::all(MessageStorage::Sim))?;
        self.sms_setup.sim_storage = true;
        Ok(())
    }

    /// Makes the modem announce stored messages with `+CMTI`, which are then
    /// delivered to the callback set with
    /// [`set_sms_callback`](Self::set_sms_callback).
    pub fn enable_new_message_indications(&mut self) -> Result<(), Error> {
        self.send(&SetNewMessageIndication::buffered(
            NewMessageIndicationMode::StoredIndication,
        ))?;
        Ok(())
    }

    fn ensure_sms_ready(&self) -> Result<(), Error> {
        if self.sms_setup.is_ready() {
            Ok(())
        } else {
            warn!("Text mode and SIM storage must be selected first");
            Err(Error::Uninitialized)
        }
    }

    pub fn delete_sms(&mut self, index: u8) -> Result<(), Error> {
        self.ensure_sms_ready()?;
        self.send(&DeleteMessage { index })?;
        Ok(())
    }

    /// Deletes every message in storage, received and sent.
    pub fn delete_all_sms(&mut self) -> Result<(), Error> {
        self.ensure_sms_ready()?;
        self.send(&DeleteAllMessages {
            flag: DeleteFlag::All,
        })?;
        Ok(())
    }

    pub fn delete_all_received_sms(&mut self) -> Result<(), Error> {
        self.ensure_sms_ready()?;
        self.send(&DeleteAllMessages {
            flag: DeleteFlag::Inbox,
        })?;
        Ok(())
    }

    /// Calls `on_sms` for every unread message, in the order the modem lists
    /// them, and returns how many were delivered. Listed messages are marked
    /// as read by the modem.
    pub fn read_all_unread_sms<F: FnMut(Sms)>(&mut self, mut on_sms: F) -> Result<usize, Error> {
        self.ensure_sms_ready()?;

        let mut reader = SmsReader::list();
        let res = self.send_streaming(
            &ListMessages {
                status: MessageStatus::ReceivedUnread,
            },
            &mut |line: &Line| reader.feed(line, &mut on_sms),
        );
        let res = res.and_then(|_| reader.finish(&mut on_sms));

        self.deliver_deferred();
        res
    }

    /// Sends a text message and returns its message reference.
    pub fn send_sms(&mut self, destination: &str, text: &str) -> Result<u8, Error> {
        self.ensure_sms_ready()?;

        let cmd = SendMessage::new(destination, text)?;
        let mr = self.send_data(&cmd, text.as_bytes())?.mr;
        debug!("Message sent, reference {}", mr);
        Ok(mr)
    }
}
