//! Slot-2 rumble cartridge driver.
//!
//! Several unrelated cartridges can shake the console, each with its
//! own detection fingerprint and motor latch. Detection is probing:
//! flip the SuperCard into firmware mode and look for its pass-through
//! header, check the cartridge header game code for the two retail
//! games with motors, or read the open-bus pattern a bare rumble pak
//! leaves on the bus. The detected kind is cached in the session so
//! the probe runs once.

use log::info;

/// Value a valid cartridge header carries in its fixed marker byte.
const HEADER_MAGIC: u8 = 0x96;

/// SuperCard mode-select values.
const SUPERCARD_MAGIC: u16 = 0xA55A;
const SUPERCARD_MODE_FIRMWARE: u16 = 0;
const SUPERCARD_MODE_RUMBLE: u16 = 1 << 3;

/// Half-words probed when looking for the rumble pak's open-bus pattern.
const PAK_PROBE_LEN: usize = 0x1000;
/// Half-words probed to confirm SuperCard rumble-mode bus decoding.
const SUPERCARD_PROBE_LEN: usize = 0x80;

/// Motor latch values per cartridge kind.
const WARIO_STRENGTH: u16 = 8;
const PAK_STRENGTH: u16 = 2;
const MAGUKIDDO_STRENGTH: u16 = 256;

/// Raw access to the slot-2 cartridge bus.
pub trait Slot2Bus {
    /// Hand the cartridge bus to this execution context.
    fn claim(&mut self);

    /// True when the cartridge bus cannot be accessed at all (newer
    /// console models fault on slot-2 reads).
    fn bus_absent(&self) -> bool;

    /// Fixed marker byte of the cartridge header.
    fn header_magic(&self) -> u8;

    /// Four-character game code from the cartridge header.
    fn game_code(&self) -> [u8; 4];

    /// Read one half-word from the cartridge address space.
    fn bus_half(&self, index: usize) -> u16;

    /// Write the SuperCard mode-select register once.
    fn supercard_enable_write(&mut self, value: u16);

    /// Write the rumble motor latch.
    fn motor_write(&mut self, value: u16);

    /// Write the WarioWare cartridge interface-enable register.
    fn wario_enable_write(&mut self, value: u16);

    /// Write the WarioWare cartridge motor latch.
    fn wario_write(&mut self, value: u16);
}

/// Detected cartridge kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RumbleKind {
    /// Detection has not run yet.
    Unknown,
    /// No rumble-capable cartridge present.
    None,
    /// Dedicated rumble pak.
    Pak,
    /// Retail cartridge with a motor (WarioWare! Twisted, Drill Dozer).
    Gba,
    /// SuperCard SD in rumble mode.
    SuperCard,
    /// Third-party pak with a different latch value; set explicitly,
    /// never probed.
    Magukiddo,
}

/// One rumble session: the cartridge bus plus the cached detection.
pub struct RumbleSession<B> {
    bus: B,
    kind: RumbleKind,
}

impl<B: Slot2Bus> RumbleSession<B> {
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            kind: RumbleKind::Unknown,
        }
    }

    pub fn kind(&self) -> RumbleKind {
        self.kind
    }

    /// Override the cached kind, for cartridges with no reliable probe.
    pub fn set_kind(&mut self, kind: RumbleKind) {
        self.kind = kind;
    }

    /// Probe the cartridge bus and cache what was found.
    pub fn detect(&mut self) -> RumbleKind {
        if self.bus.bus_absent() {
            return self.kind;
        }

        self.bus.claim();
        self.kind = RumbleKind::None;

        if self.supercard_probe() {
            self.kind = RumbleKind::SuperCard;
            info!("rumble: SuperCard SD detected");
            return self.kind;
        }

        if self.bus.header_magic() == HEADER_MAGIC {
            let code = self.bus.game_code();
            // WarioWare! Twisted (RZWx) and Drill Dozer (V49x) carry a motor.
            if &code[..3] == b"RZW" || &code[..3] == b"V49" {
                self.kind = RumbleKind::Gba;
                self.bus.wario_enable_write(WARIO_STRENGTH);
                info!("rumble: motorized game cartridge detected");
            }
        } else {
            // A bare rumble pak leaves this open-bus pattern: every
            // address reads back as itself with bit 1 tied low.
            for i in 0..PAK_PROBE_LEN {
                if self.bus.bus_half(i) != (i as u16 & 0xFFFD) {
                    return self.kind;
                }
            }
            self.kind = RumbleKind::Pak;
            info!("rumble: rumble pak detected");
        }

        self.kind
    }

    /// True if a rumble-capable cartridge is present, probing first if
    /// detection has not run.
    pub fn is_inserted(&mut self) -> bool {
        if self.kind == RumbleKind::Unknown {
            self.detect();
        }
        !matches!(self.kind, RumbleKind::Unknown | RumbleKind::None)
    }

    /// Re-latch the mode a SuperCard needs to keep its motor running.
    pub fn enable(&mut self) {
        if self.kind == RumbleKind::SuperCard {
            self.set_supercard_mode(SUPERCARD_MODE_RUMBLE);
        }
    }

    /// Drive the motor on or off.
    pub fn set(&mut self, on: bool) {
        // The bus may have been handed elsewhere since detection.
        self.bus.claim();
        match self.kind {
            RumbleKind::Gba => self.bus.wario_write(if on { WARIO_STRENGTH } else { 0 }),
            RumbleKind::Pak | RumbleKind::SuperCard => {
                self.bus.motor_write(if on { PAK_STRENGTH } else { 0 });
            }
            RumbleKind::Magukiddo => {
                self.bus.motor_write(if on { MAGUKIDDO_STRENGTH } else { 0 });
            }
            RumbleKind::Unknown | RumbleKind::None => {}
        }
    }

    /// The mode register wants every value written twice, magic first.
    fn set_supercard_mode(&mut self, mode: u16) {
        self.bus.supercard_enable_write(SUPERCARD_MAGIC);
        self.bus.supercard_enable_write(SUPERCARD_MAGIC);
        self.bus.supercard_enable_write(mode);
        self.bus.supercard_enable_write(mode);
    }

    fn supercard_probe(&mut self) -> bool {
        // In firmware mode the bus shows a valid pass-through header.
        self.set_supercard_mode(SUPERCARD_MODE_FIRMWARE);
        if self.bus.header_magic() != HEADER_MAGIC {
            return false;
        }
        if self.bus.game_code() != *b"PASS" {
            return false;
        }

        // In rumble mode the whole bus decodes to one register with
        // bit 1 tied low; check enough addresses to rule out chance.
        self.set_supercard_mode(SUPERCARD_MODE_RUMBLE);
        for i in 0..SUPERCARD_PROBE_LEN {
            if self.bus.bus_half(i) & 0x2 != 0 {
                return false;
            }
        }

        // Leave rumble mode latched so the motor can run.
        true
    }
}
