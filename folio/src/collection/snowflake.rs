use crate::collection::DocumentId;
use crate::common::util::get_current_time_or_zero;
use log::info;
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::Rng;

const NODE_ID_BITS: u64 = 10;
const SEQUENCE_BITS: u64 = 12;
const MAX_NODE_ID: u64 = (1 << NODE_ID_BITS) - 1;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;
const TIMESTAMP_LEFT_SHIFT: u64 = SEQUENCE_BITS + NODE_ID_BITS;
const EPOCH: u64 = 1288834974657;

struct GeneratorState {
    last_timestamp: u64,
    sequence: u64,
}

/// Snowflake style generator of [`DocumentId`]s.
///
/// Ids are laid out as `timestamp | node id | sequence`, so ids produced by
/// one generator are strictly increasing. Each database owns one generator
/// and shares it with all of its collections.
pub struct IdGenerator {
    node_id: u64,
    state: Mutex<GeneratorState>,
}

impl IdGenerator {
    pub fn new() -> Self {
        let node_id = Self::random_node_id();
        info!("Initialized id generator with node id: {}", node_id);

        IdGenerator {
            node_id,
            state: Mutex::new(GeneratorState {
                last_timestamp: 0,
                sequence: 0,
            }),
        }
    }

    pub fn next_id(&self) -> DocumentId {
        let mut state = self.state.lock();

        let mut timestamp = get_current_time_or_zero().max(EPOCH);
        // clock moved backwards, keep issuing ids on the last timestamp
        if timestamp < state.last_timestamp {
            timestamp = state.last_timestamp;
        }

        if timestamp == state.last_timestamp {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                // sequence exhausted for this millisecond, borrow the next one
                timestamp += 1;
            }
        } else {
            state.sequence = 0;
        }
        state.last_timestamp = timestamp;

        let id_value = ((timestamp - EPOCH) << TIMESTAMP_LEFT_SHIFT)
            | (self.node_id << SEQUENCE_BITS)
            | state.sequence;
        DocumentId::from_generated(id_value)
    }

    fn random_node_id() -> u64 {
        let uuid = uuid::Uuid::new_v4();
        let uid = uuid.as_bytes();
        let rnd_byte = OsRng.gen::<u64>() & 0xFF;

        ((uid[uid.len() - 1] as u64) | (rnd_byte << 8)) & MAX_NODE_ID
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
