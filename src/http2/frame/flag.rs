// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

use bitflags::bitflags;

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash)]
    pub struct Flag: u8 {
        const END_STREAM = 0x1;
        const ACK = 0x1;
        const END_HEADERS = 0x4;
        const PADDED = 0x8;
        const PRIORITY = 0x20;
    }
}

impl Flag {
    pub fn zero() -> Flag {
        Flag::empty()
    }

    pub fn load(bits: u8) -> Flag {
        Flag::from_bits_truncate(bits)
    }

    pub fn bits_u8(&self) -> u8 {
        self.bits()
    }

    pub fn ack() -> Flag {
        Flag::ACK
    }

    pub fn is_ack(&self) -> bool {
        self.contains(Flag::ACK)
    }

    pub fn end_headers() -> Flag {
        Flag::END_HEADERS
    }

    pub fn is_end_headers(&self) -> bool {
        self.contains(Flag::END_HEADERS)
    }

    pub fn set_end_headers(&mut self) {
        self.insert(Flag::END_HEADERS);
    }

    pub fn unset_end_headers(&mut self) {
        self.remove(Flag::END_HEADERS);
    }

    pub fn padded() -> Flag {
        Flag::PADDED
    }

    pub fn is_padded(&self) -> bool {
        self.contains(Flag::PADDED)
    }

    pub fn set_padded(&mut self) {
        self.insert(Flag::PADDED);
    }

    pub fn unset_padded(&mut self) {
        self.remove(Flag::PADDED);
    }

    pub fn priority() -> Flag {
        Flag::PRIORITY
    }

    pub fn is_priority(&self) -> bool {
        self.contains(Flag::PRIORITY)
    }

    pub fn end_stream() -> Flag {
        Flag::END_STREAM
    }

    pub fn is_end_stream(&self) -> bool {
        self.contains(Flag::END_STREAM)
    }

    pub fn set_end_stream(&mut self) {
        self.insert(Flag::END_STREAM);
    }

    pub fn unset_end_stream(&mut self) {
        self.remove(Flag::END_STREAM);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_and_end_stream_share_a_bit() {
        assert_eq!(Flag::ack(), Flag::end_stream());
    }

    #[test]
    fn unknown_bits_are_dropped_on_load() {
        let f = Flag::load(0xff);
        assert_eq!(f.bits_u8(), 0x1 | 0x4 | 0x8 | 0x20);
    }
}
