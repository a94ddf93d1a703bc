use serde::Serialize;

use crate::ogg::{
    OGG_HEADER_LEN, OGG_HEADER_TYPE_BOS, OGG_HEADER_TYPE_CONTINUATION, OGG_HEADER_TYPE_EOS,
    OGG_SIGNATURE,
};
use crate::utils::io::{le_u32, le_u64};

/// Header of an encoded OGG page, parsed from a borrowed page buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageHeader {
    pub version: u8,
    pub header_type: u8,
    pub granule_position: u64,
    pub bitstream_serial: u32,
    pub page_sequence: u32,
    pub crc: u32,
    #[serde(skip)]
    pub segment_table: Vec<u8>,
}

impl PageHeader {
    /// Parse the header at the start of `data`.
    ///
    /// Returns `None` when the bytes are not an OGG page or the header is truncated.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < OGG_HEADER_LEN || &data[0..4] != OGG_SIGNATURE {
            return None;
        }

        let version = data[4];
        if version != 0 {
            return None;
        }

        let segment_count = data[26] as usize;
        let segment_table = data.get(OGG_HEADER_LEN..OGG_HEADER_LEN + segment_count)?;

        Some(PageHeader {
            version,
            header_type: data[5],
            granule_position: le_u64(data, 6)?,
            bitstream_serial: le_u32(data, 14)?,
            page_sequence: le_u32(data, 18)?,
            crc: le_u32(data, 22)?,
            segment_table: segment_table.to_vec(),
        })
    }

    /// Header size including the segment table
    pub fn header_len(&self) -> usize {
        OGG_HEADER_LEN + self.segment_table.len()
    }

    /// Calculate total page data size from segment table
    pub fn body_len(&self) -> usize {
        self.segment_table.iter().map(|&x| x as usize).sum()
    }

    /// Header plus body
    pub fn page_len(&self) -> usize {
        self.header_len() + self.body_len()
    }

    /// Page body within `data`, if `data` holds the whole page
    pub fn body<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
        data.get(self.header_len()..self.page_len())
    }

    pub fn is_continuation(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_CONTINUATION != 0
    }

    /// Check if this is the beginning of a stream
    pub fn is_bos(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_BOS != 0
    }

    pub fn is_eos(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_EOS != 0
    }
}
