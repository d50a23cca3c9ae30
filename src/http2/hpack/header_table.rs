// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

//! The indexed header table: the logical concatenation `[static | dynamic]`
//! that HPACK indices address. Index 1..=61 is the static table; 62.. is the
//! dynamic table, newest entry first.

use super::dynamic_table::DynamicTable;
use super::static_table;

pub const STATIC_TABLE_LEN: usize = 61;

pub struct HeaderTable {
    pub dynamic: DynamicTable,
}

impl HeaderTable {
    pub fn new(dynamic_max_size: usize) -> Self {
        HeaderTable { dynamic: DynamicTable::new(dynamic_max_size) }
    }

    /// 1-based; index 0 is never valid.
    pub fn entry(&self, index: usize) -> Option<(Vec<u8>, Vec<u8>)> {
        if index == 0 {
            return None;
        }
        if index <= STATIC_TABLE_LEN {
            return static_table::get(index).map(|(n, v)| (n.as_bytes().to_vec(), v.as_bytes().to_vec()));
        }
        self.dynamic
            .entry(index - STATIC_TABLE_LEN - 1)
            .map(|(n, v)| (n.clone(), v.clone()))
    }

    /// Search order: static exact match, then dynamic exact match, then
    /// static name-only match, then dynamic name-only match. First match in
    /// table order wins.
    pub fn first_match(&self, name: &[u8], value: &[u8]) -> Option<(usize, bool)> {
        if let Some(idx) = static_table::find_exact(name, value) {
            return Some((idx, true));
        }
        for (i, (n, v)) in self.dynamic.iter().enumerate() {
            if n.as_slice() == name && v.as_slice() == value {
                return Some((STATIC_TABLE_LEN + i + 1, true));
            }
        }
        if let Some(idx) = static_table::find_name(name) {
            return Some((idx, false));
        }
        for (i, (n, _)) in self.dynamic.iter().enumerate() {
            if n.as_slice() == name {
                return Some((STATIC_TABLE_LEN + i + 1, false));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_then_dynamic_indexing() {
        let mut t = HeaderTable::new(4096);
        t.dynamic.insert(b"custom-key".to_vec(), b"custom-header".to_vec());
        assert_eq!(t.entry(1), Some((b":authority".to_vec(), b"".to_vec())));
        assert_eq!(t.entry(62), Some((b"custom-key".to_vec(), b"custom-header".to_vec())));
        assert_eq!(t.entry(0), None);
        assert_eq!(t.entry(63), None);
    }

    #[test]
    fn first_match_prefers_exact_over_name_only() {
        let t = HeaderTable::new(4096);
        assert_eq!(t.first_match(b":method", b"GET"), Some((2, true)));
        assert_eq!(t.first_match(b":method", b"PATCH"), Some((2, false)));
    }

    #[test]
    fn first_match_prefers_dynamic_exact_over_static_name_only() {
        let mut t = HeaderTable::new(4096);
        t.dynamic.insert(b"x-custom".to_vec(), b"v1".to_vec());
        assert_eq!(t.first_match(b"x-custom", b"v1"), Some((62, true)));
        assert_eq!(t.first_match(b"x-custom", b"v2"), Some((62, false)));
    }
}
