//! Memory map from the `-showmem` listing.
//!
//! The assembler prints one line per segment, e.g. `$0801-$080d Basic`, where a
//! leading `*` marks segments that are not written to the output.  This is a
//! plain text scan that does not depend on the symbol model.

use serde::Serialize;
use log::trace;

#[derive(Clone,Debug,PartialEq,Eq,Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySegment {
    pub start: u16,
    /// inclusive
    pub end: u16,
    pub label: String,
    pub starred: bool
}

impl MemorySegment {
    pub fn len(&self) -> usize {
        match self.end >= self.start {
            true => (self.end - self.start) as usize + 1,
            false => 0
        }
    }
}

/// Gather every segment line in the text, other lines are skipped.
pub fn parse(text: &str) -> Vec<MemorySegment> {
    let mut ans = Vec::new();
    let patt = match regex::Regex::new(r"(?i)^\s*(\*)?\$([0-9a-f]{4})\-\$([0-9a-f]{4})\s(.*)$") {
        Ok(re) => re,
        Err(_) => return ans
    };
    for line in text.lines() {
        let caps = match patt.captures(line.trim_end_matches('\r')) {
            Some(c) => c,
            None => continue
        };
        let start = u16::from_str_radix(&caps[2], 16);
        let end = u16::from_str_radix(&caps[3], 16);
        if let (Ok(start),Ok(end)) = (start,end) {
            ans.push(MemorySegment {
                start,
                end,
                label: caps[4].trim().to_string(),
                starred: caps.get(1).is_some()
            });
        }
    }
    trace!("found {} memory segments",ans.len());
    ans
}

#[cfg(test)]
mod tests {
    #[test]
    fn segments() {
        let text = "Memory Map\n----------\nDefault-segment:\n  $0801-$080d Basic\n  *$0810-$0a3f Basic End\n\nWriting prg file: x.prg\n";
        let segs = super::parse(text);
        assert_eq!(segs.len(),2);
        assert_eq!(segs[0].start,0x801);
        assert_eq!(segs[0].end,0x80d);
        assert_eq!(segs[0].label,"Basic");
        assert!(!segs[0].starred);
        assert_eq!(segs[1].label,"Basic End");
        assert!(segs[1].starred);
        assert_eq!(segs[1].len(),0x230);
    }
}
