use crate::message::N2kFrame;

/// Trait for components that consume decoded NMEA2000 messages
///
/// Every handler sees every frame and decides internally which PGNs it
/// cares about.
pub trait MessageHandler {
    /// Process one decoded frame. `timestamp` is the capture time as it
    /// appeared in the input.
    fn handle_message(&mut self, frame: &N2kFrame, timestamp: &str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::PgnTable;

    #[derive(Default)]
    struct PgnCollector {
        seen: Vec<(u32, String)>,
    }

    impl MessageHandler for PgnCollector {
        fn handle_message(&mut self, frame: &N2kFrame, timestamp: &str) {
            if frame.message.is_known() {
                self.seen.push((frame.pgn(), timestamp.to_string()));
            }
        }
    }

    #[test]
    fn test_handler_filters_internally() {
        let table = PgnTable::builtin();
        let known = N2kFrame::decode(table, 3, 59904, 1, 255, &[0x00, 0xEE, 0x00]);
        let unknown = N2kFrame::decode(table, 3, 0x3FFFF, 1, 255, &[0]);
        let mut collector = PgnCollector::default();
        collector.handle_message(&known, "t0");
        collector.handle_message(&unknown, "t1");
        assert_eq!(collector.seen, vec![(59904, "t0".to_string())]);
    }
}
