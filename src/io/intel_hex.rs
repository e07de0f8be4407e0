use super::ParseError;
use crate::MemoryImage;

const RECORD_DATA: u8 = 0x00;
const RECORD_EOF: u8 = 0x01;
const RECORD_EXTENDED_SEGMENT: u8 = 0x02;
const RECORD_START_SEGMENT: u8 = 0x03;
const RECORD_EXTENDED_LINEAR: u8 = 0x04;
const RECORD_START_LINEAR: u8 = 0x05;

#[derive(Debug, Clone)]
pub struct IntelHexWriteOptions {
    /// Maximum payload bytes per data record.
    pub bytes_per_line: u8,
}

impl Default for IntelHexWriteOptions {
    fn default() -> Self {
        Self { bytes_per_line: 32 }
    }
}

struct Record<'a> {
    address: u16,
    record_type: u8,
    data: &'a [u8],
}

/// Decode Intel HEX text into a memory image.
///
/// Data records that overwrite earlier records in the same file follow last wins.
/// Start address records (03/05) are kept on the image; anything after the
/// EOF record is an error.
pub fn parse_intel_hex(input: &[u8]) -> Result<MemoryImage, ParseError> {
    let text = std::str::from_utf8(input).map_err(|e| ParseError::InvalidRecord {
        line: 1,
        message: format!("invalid UTF-8: {e}"),
    })?;

    let mut image = MemoryImage::new();
    let mut base: u32 = 0;
    let mut eof_seen = false;

    for (index, line) in text.lines().enumerate() {
        let line_num = index + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if eof_seen {
            return Err(ParseError::InvalidRecord {
                line: line_num,
                message: "data after EOF record".to_string(),
            });
        }

        let bytes = decode_line(line, line_num)?;
        let record = split_record(&bytes, line_num)?;

        match record.record_type {
            RECORD_DATA => {
                let address = base
                    .checked_add(record.address as u32)
                    .ok_or_else(|| ParseError::AddressOverflow(format!("line {line_num}")))?;
                if address as u64 + record.data.len() as u64 > 1 << 32 {
                    return Err(ParseError::AddressOverflow(format!("line {line_num}")));
                }
                image.write(address, record.data);
            }
            RECORD_EOF => eof_seen = true,
            RECORD_EXTENDED_SEGMENT => {
                let value = expect_u16(&record, line_num)?;
                base = (value as u32) << 4;
            }
            RECORD_EXTENDED_LINEAR => {
                let value = expect_u16(&record, line_num)?;
                base = (value as u32) << 16;
            }
            RECORD_START_SEGMENT => {
                let [cs_hi, cs_lo, ip_hi, ip_lo] = expect_u32_bytes(&record, line_num)?;
                let cs = u16::from_be_bytes([cs_hi, cs_lo]) as u32;
                let ip = u16::from_be_bytes([ip_hi, ip_lo]) as u32;
                image.set_start_address(Some((cs << 4) + ip));
            }
            RECORD_START_LINEAR => {
                let bytes = expect_u32_bytes(&record, line_num)?;
                image.set_start_address(Some(u32::from_be_bytes(bytes)));
            }
            record_type => {
                return Err(ParseError::UnsupportedRecordType {
                    line: line_num,
                    record_type,
                });
            }
        }
    }

    if !eof_seen {
        return Err(ParseError::UnexpectedEof);
    }
    Ok(image)
}

/// Encode a memory image as Intel HEX using extended linear addressing.
///
/// Records never cross a 64 KiB boundary and carry at most
/// `options.bytes_per_line` data bytes.
pub fn write_intel_hex(image: &MemoryImage, options: &IntelHexWriteOptions) -> Vec<u8> {
    let bytes_per_line = options.bytes_per_line.max(1) as usize;
    let mut output = Vec::with_capacity(image.total_bytes() * 2 + image.total_bytes() / 2);
    let mut upper: u16 = 0;

    for segment in image.segments() {
        let mut addr = segment.start_address;
        let mut offset = 0;

        while offset < segment.len() {
            let needed = (addr >> 16) as u16;
            if needed != upper {
                write_record(&mut output, RECORD_EXTENDED_LINEAR, 0, &needed.to_be_bytes());
                upper = needed;
            }

            let low = (addr & 0xFFFF) as u16;
            let left_in_bank = 0x10000 - low as usize;
            let len = bytes_per_line
                .min(left_in_bank)
                .min(segment.len() - offset);
            write_record(&mut output, RECORD_DATA, low, &segment.data[offset..offset + len]);

            offset += len;
            addr = addr.wrapping_add(len as u32);
        }
    }

    if let Some(start) = image.start_address() {
        write_record(&mut output, RECORD_START_LINEAR, 0, &start.to_be_bytes());
    }
    write_record(&mut output, RECORD_EOF, 0, &[]);
    output
}

fn decode_line(line: &str, line_num: usize) -> Result<Vec<u8>, ParseError> {
    let Some(hex_str) = line.strip_prefix(':') else {
        return Err(ParseError::InvalidRecord {
            line: line_num,
            message: "line does not start with ':'".to_string(),
        });
    };
    if hex_str.len() < 10 {
        return Err(ParseError::InvalidRecord {
            line: line_num,
            message: "record too short".to_string(),
        });
    }
    if !hex_str.len().is_multiple_of(2) {
        return Err(ParseError::InvalidRecord {
            line: line_num,
            message: "odd number of hex digits".to_string(),
        });
    }

    let mut out = Vec::with_capacity(hex_str.len() / 2);
    for pair in hex_str.as_bytes().chunks_exact(2) {
        out.push((hex_digit(pair[0], line_num)? << 4) | hex_digit(pair[1], line_num)?);
    }

    let sum = out.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    if sum != 0 {
        let actual = out[out.len() - 1];
        let expected = out[..out.len() - 1]
            .iter()
            .fold(0u8, |acc, &b| acc.wrapping_add(b))
            .wrapping_neg();
        return Err(ParseError::ChecksumMismatch {
            line: line_num,
            expected,
            actual,
        });
    }
    Ok(out)
}

fn split_record(bytes: &[u8], line_num: usize) -> Result<Record<'_>, ParseError> {
    let byte_count = bytes[0] as usize;
    let available = bytes.len() - 5;
    if byte_count != available {
        return Err(ParseError::InvalidRecord {
            line: line_num,
            message: format!("byte count mismatch: header says {byte_count}, got {available}"),
        });
    }
    Ok(Record {
        address: u16::from_be_bytes([bytes[1], bytes[2]]),
        record_type: bytes[3],
        data: &bytes[4..4 + byte_count],
    })
}

fn expect_u16(record: &Record<'_>, line_num: usize) -> Result<u16, ParseError> {
    match record.data {
        [hi, lo] => Ok(u16::from_be_bytes([*hi, *lo])),
        _ => Err(ParseError::InvalidRecord {
            line: line_num,
            message: format!(
                "record type {:02X} must have 2 data bytes",
                record.record_type
            ),
        }),
    }
}

fn expect_u32_bytes(record: &Record<'_>, line_num: usize) -> Result<[u8; 4], ParseError> {
    record
        .data
        .try_into()
        .map_err(|_| ParseError::InvalidRecord {
            line: line_num,
            message: format!(
                "record type {:02X} must have 4 data bytes",
                record.record_type
            ),
        })
}

fn hex_digit(b: u8, line_num: usize) -> Result<u8, ParseError> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        _ => Err(ParseError::InvalidHexDigit {
            line: line_num,
            char: b as char,
        }),
    }
}

fn write_record(output: &mut Vec<u8>, record_type: u8, address: u16, data: &[u8]) {
    let [addr_hi, addr_lo] = address.to_be_bytes();
    let header = [data.len() as u8, addr_hi, addr_lo, record_type];
    let checksum = header
        .iter()
        .chain(data)
        .fold(0u8, |acc, &b| acc.wrapping_add(b))
        .wrapping_neg();

    output.push(b':');
    for &b in header.iter().chain(data).chain(std::iter::once(&checksum)) {
        write_hex_byte(output, b);
    }
    output.push(b'\n');
}

fn write_hex_byte(output: &mut Vec<u8>, byte: u8) {
    const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";
    output.push(HEX_CHARS[(byte >> 4) as usize]);
    output.push(HEX_CHARS[(byte & 0x0F) as usize]);
}
