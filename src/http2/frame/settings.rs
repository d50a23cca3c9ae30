// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

use crate::binary::{Buf, BufMut};
use crate::error::Http2Error;
use crate::http2::{DEFAULT_MAX_FRAME_SIZE, MAX_INITIAL_WINDOW_SIZE, MAX_MAX_FRAME_SIZE};

use super::{Flag, FrameHeader, Kind, StreamIdentifier};

/// The settings a SETTINGS frame carries, one slot per identifier defined in
/// RFC 7540 section 6.5.2 plus the RFC 8441 extended-connect identifier.
#[derive(Clone, Default, Eq, PartialEq, Debug, Hash)]
pub struct Settings {
    flags: Flag,
    header_table_size: Option<u32>,
    enable_push: Option<u32>,
    max_concurrent_streams: Option<u32>,
    initial_window_size: Option<u32>,
    max_frame_size: Option<u32>,
    max_header_list_size: Option<u32>,
    enable_connect_protocol: Option<u32>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Setting {
    HeaderTableSize(u32),
    EnablePush(u32),
    MaxConcurrentStreams(u32),
    InitialWindowSize(u32),
    MaxFrameSize(u32),
    MaxHeaderListSize(u32),
    EnableConnectProtocol(u32),
}

#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SettingIdentifier {
    HeaderTableSize = 0x1,
    EnablePush = 0x2,
    MaxConcurrentStreams = 0x3,
    InitialWindowSize = 0x4,
    MaxFrameSize = 0x5,
    MaxHeaderListSize = 0x6,
    EnableConnectProtocol = 0x8,
}

impl Setting {
    pub fn from_id(id: u16, val: u32) -> Option<Setting> {
        use Setting::*;
        match id {
            0x1 => Some(HeaderTableSize(val)),
            0x2 => Some(EnablePush(val)),
            0x3 => Some(MaxConcurrentStreams(val)),
            0x4 => Some(InitialWindowSize(val)),
            0x5 => Some(MaxFrameSize(val)),
            0x6 => Some(MaxHeaderListSize(val)),
            0x8 => Some(EnableConnectProtocol(val)),
            _ => None,
        }
    }

    fn parse(bytes: &mut impl Buf) -> Option<Setting> {
        let id = bytes.get_u16();
        let val = bytes.get_u32();
        Setting::from_id(id, val)
    }

    fn encode(&self, dst: &mut impl BufMut) -> usize {
        use Setting::*;
        let (id, val) = match *self {
            HeaderTableSize(v) => (0x1, v),
            EnablePush(v) => (0x2, v),
            MaxConcurrentStreams(v) => (0x3, v),
            InitialWindowSize(v) => (0x4, v),
            MaxFrameSize(v) => (0x5, v),
            MaxHeaderListSize(v) => (0x6, v),
            EnableConnectProtocol(v) => (0x8, v),
        };
        dst.put_u16(id);
        dst.put_u32(val);
        6
    }
}

impl Settings {
    pub fn ack() -> Settings {
        Settings { flags: Flag::ack(), ..Settings::default() }
    }

    pub fn is_ack(&self) -> bool {
        self.flags.is_ack()
    }

    pub fn flags(&self) -> Flag {
        self.flags
    }

    pub fn header_table_size(&self) -> Option<u32> {
        self.header_table_size
    }

    pub fn set_header_table_size(&mut self, size: Option<u32>) {
        self.header_table_size = size;
    }

    pub fn is_push_enabled(&self) -> Option<bool> {
        self.enable_push.map(|v| v != 0)
    }

    pub fn set_enable_push(&mut self, enable: bool) {
        self.enable_push = Some(enable as u32);
    }

    pub fn max_concurrent_streams(&self) -> Option<u32> {
        self.max_concurrent_streams
    }

    pub fn set_max_concurrent_streams(&mut self, max: Option<u32>) {
        self.max_concurrent_streams = max;
    }

    pub fn initial_window_size(&self) -> Option<u32> {
        self.initial_window_size
    }

    pub fn set_initial_window_size(&mut self, size: Option<u32>) {
        self.initial_window_size = size;
    }

    pub fn max_frame_size(&self) -> Option<u32> {
        self.max_frame_size
    }

    pub fn set_max_frame_size(&mut self, size: Option<u32>) {
        self.max_frame_size = size;
    }

    pub fn max_header_list_size(&self) -> Option<u32> {
        self.max_header_list_size
    }

    pub fn set_max_header_list_size(&mut self, size: Option<u32>) {
        self.max_header_list_size = size;
    }

    pub fn is_extended_connect_protocol_enabled(&self) -> Option<bool> {
        self.enable_connect_protocol.map(|v| v != 0)
    }

    pub fn set_enable_connect_protocol(&mut self, val: Option<u32>) {
        self.enable_connect_protocol = val;
    }

    pub fn parse(head: &FrameHeader, payload: &mut impl Buf) -> Result<Settings, Http2Error> {
        use Setting::*;

        if !head.stream_id().is_zero() {
            return Err(Http2Error::InvalidStreamId);
        }

        if head.flag().is_ack() {
            if payload.has_remaining() {
                return Err(Http2Error::InvalidPayloadLength);
            }
            return Ok(Settings::ack());
        }

        if payload.remaining() % 6 != 0 {
            return Err(Http2Error::PartialSettingLength);
        }

        let mut settings = Settings::default();
        let count = payload.remaining() / 6;
        for _ in 0..count {
            match Setting::parse(payload) {
                Some(HeaderTableSize(v)) => settings.header_table_size = Some(v),
                Some(EnablePush(v)) => match v {
                    0 | 1 => settings.enable_push = Some(v),
                    _ => return Err(Http2Error::InvalidSettingValue),
                },
                Some(MaxConcurrentStreams(v)) => settings.max_concurrent_streams = Some(v),
                Some(InitialWindowSize(v)) => {
                    if v > MAX_INITIAL_WINDOW_SIZE {
                        return Err(Http2Error::InvalidSettingValue);
                    }
                    settings.initial_window_size = Some(v);
                }
                Some(MaxFrameSize(v)) => {
                    if !(DEFAULT_MAX_FRAME_SIZE..=MAX_MAX_FRAME_SIZE).contains(&v) {
                        return Err(Http2Error::InvalidSettingValue);
                    }
                    settings.max_frame_size = Some(v);
                }
                Some(MaxHeaderListSize(v)) => settings.max_header_list_size = Some(v),
                Some(EnableConnectProtocol(v)) => match v {
                    0 | 1 => settings.enable_connect_protocol = Some(v),
                    _ => return Err(Http2Error::InvalidSettingValue),
                },
                // Unknown setting identifiers are ignored, per RFC 7540 6.5.2.
                None => {}
            }
        }
        Ok(settings)
    }

    pub fn payload_len(&self) -> usize {
        let mut len = 0;
        self.for_each(|_| len += 6);
        len
    }

    pub fn encode(&self, dst: &mut impl BufMut) -> usize {
        let mut head = FrameHeader::new(Kind::Settings, self.flags, StreamIdentifier::zero());
        head.length = self.payload_len() as u32;

        let mut size = head.encode(dst);
        self.for_each(|setting| {
            log::trace!("encoding setting; val={:?}", setting);
            size += setting.encode(dst);
        });
        size
    }

    fn for_each<F: FnMut(Setting)>(&self, mut f: F) {
        use Setting::*;
        if let Some(v) = self.header_table_size {
            f(HeaderTableSize(v));
        }
        if let Some(v) = self.enable_push {
            f(EnablePush(v));
        }
        if let Some(v) = self.max_concurrent_streams {
            f(MaxConcurrentStreams(v));
        }
        if let Some(v) = self.initial_window_size {
            f(InitialWindowSize(v));
        }
        if let Some(v) = self.max_frame_size {
            f(MaxFrameSize(v));
        }
        if let Some(v) = self.max_header_list_size {
            f(MaxHeaderListSize(v));
        }
        if let Some(v) = self.enable_connect_protocol {
            f(EnableConnectProtocol(v));
        }
    }
}
