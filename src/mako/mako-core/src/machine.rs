use crate::constants::audio::DEFAULT_SAMPLE_RATE;
use crate::cpu::Cpu;
use crate::error::{Result, VmError};
use crate::memory::audio::SampleBuffer;
use crate::memory::mods::{AudioSink, CharDevice, FrameSink};
use crate::memory::{Keypad, MemoryMap};
use crate::video::Video;

use log::{debug, info};

/// Host-selected machine settings
#[derive(Debug, Clone)]
pub struct MachineConfig {
    pub sample_rate: u32,  // Native rate of the host audio device
    pub seed: Option<u64>, // Fixed RN seed, entropy when None
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            seed: None,
        }
    }
}

/// Frame driver state; Halted is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Running,
    Halted,
}

/// A loaded program plus the hardware that its register writes drive
pub struct Machine {
    cpu: Cpu,
    video: Video,
    state: FrameState,
    pub frames: u64, // Completed frames
}

impl Machine {
    pub fn new(image: Vec<i32>, config: &MachineConfig) -> Machine {
        let memory = MemoryMap::new(image, config.seed, config.sample_rate);
        info!("Loaded {} words", memory.len());
        Machine {
            cpu: Cpu::new(memory),
            video: Video::new(),
            state: FrameState::Running,
            frames: 0,
        }
    }

    pub fn attach_console(&mut self, console: Box<dyn CharDevice>) {
        self.cpu.memory_mut().attach_console(console);
    }

    /// Handle for feeding buttons and typed characters from the host
    pub fn keypad(&self) -> Keypad {
        self.cpu.memory().io().input.keypad()
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == FrameState::Halted
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    /// 640x480 RGBA output of the last completed frame
    pub fn framebuffer(&self) -> &[u8] {
        self.video.frame()
    }

    pub fn video(&self) -> &Video {
        &self.video
    }

    pub fn audio(&self) -> &SampleBuffer {
        &self.cpu.memory().io().audio
    }

    /// Faults stop the machine for good
    fn guard<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.state = FrameState::Halted;
        }
        result
    }

    fn halt_requested(&mut self) -> bool {
        if self.cpu.pc() < 0 {
            info!("Program halted after {} steps", self.cpu.total_steps);
            self.state = FrameState::Halted;
            return true;
        }
        false
    }

    /// Run until the next SYNC and complete the frame
    /// A negative PC halts without rendering
    pub fn run_frame(&mut self) -> Result<FrameState> {
        if self.is_halted() {
            return Ok(FrameState::Halted);
        }

        loop {
            if self.halt_requested() {
                return Ok(FrameState::Halted);
            }
            let at_sync = self.cpu.at_sync();
            if self.guard(at_sync)? {
                break;
            }
            let stepped = self.cpu.step();
            self.guard(stepped)?;
        }

        self.video.render(self.cpu.memory());
        let pc = self.cpu.pc();
        self.cpu.set_pc(pc.wrapping_add(1));

        let io = self.cpu.memory_mut().io_mut();
        io.audio.end_frame();
        io.input.latch();

        self.frames += 1;
        debug!("Frame {} complete", self.frames);
        Ok(FrameState::Running)
    }

    /// Run a frame and hand its picture and sound to the host sinks
    pub fn run_frame_into(
        &mut self,
        display: &mut dyn FrameSink,
        speaker: &mut dyn AudioSink,
    ) -> Result<FrameState> {
        let state = self.run_frame()?;
        if state == FrameState::Running {
            display.present(self.video.frame());
            speaker.submit(self.audio().last_frame());
        }
        Ok(state)
    }

    /// Headless execution of at most `budget` instructions
    /// Without a frame sink, reaching SYNC is a fault
    pub fn run_headless(&mut self, budget: usize) -> Result<FrameState> {
        if self.is_halted() {
            return Ok(FrameState::Halted);
        }

        for _ in 0..budget {
            if self.halt_requested() {
                return Ok(FrameState::Halted);
            }
            let at_sync = self.cpu.at_sync();
            if self.guard(at_sync)? {
                let pc = self.cpu.pc();
                return self.guard(Err(VmError::UnsupportedSync { pc }));
            }
            let stepped = self.cpu.step();
            self.guard(stepped)?;
        }

        if self.halt_requested() {
            return Ok(FrameState::Halted);
        }
        Ok(FrameState::Running)
    }
}

#[cfg(test)]
mod machine_tests {
    use super::*;
    use crate::constants::keys::*;
    use crate::constants::opcodes::*;
    use crate::constants::ports::*;
    use crate::constants::registers::*;
    use crate::cpu::tests::{image, PROGRAM_BASE};
    use std::cell::RefCell;
    use std::rc::Rc;

    const START: i32 = PROGRAM_BASE;

    fn machine(program: &[i32]) -> Machine {
        let config = MachineConfig {
            sample_rate: 8000,
            seed: Some(11),
        };
        Machine::new(image(program), &config)
    }

    /// Writes -1 into PC
    const HALT: [i32; 5] = [OP_CONST, -1, OP_CONST, REGISTER_PC as i32, OP_STOR];

    struct Recorder {
        input: Vec<i32>,
        output: Rc<RefCell<Vec<i32>>>,
    }

    impl CharDevice for Recorder {
        fn read(&mut self) -> i32 {
            if self.input.is_empty() {
                -1
            } else {
                self.input.remove(0)
            }
        }

        fn write(&mut self, value: i32) {
            self.output.borrow_mut().push(value);
        }
    }

    #[derive(Default)]
    struct Frames {
        presented: usize,
        samples: Vec<usize>,
    }

    impl FrameSink for Frames {
        fn present(&mut self, frame: &[u8]) {
            assert_eq!(frame.len(), 640 * 480 * 4);
            self.presented += 1;
        }
    }

    impl AudioSink for Frames {
        fn submit(&mut self, samples: &[f32]) {
            self.samples.push(samples.len());
        }
    }

    #[test]
    fn test_sync_completes_frame_and_advances_pc() {
        let mut m = machine(&[OP_CONST, 1, OP_SYNC, OP_JUMP, START]);
        assert_eq!(m.run_frame(), Ok(FrameState::Running));
        assert_eq!(m.cpu().pc(), START + 3);
        assert_eq!(m.frames, 1);

        // Loops back to the same SYNC
        assert_eq!(m.run_frame(), Ok(FrameState::Running));
        assert_eq!(m.cpu().pc(), START + 3);
        assert_eq!(m.frames, 2);
    }

    #[test]
    fn test_negative_pc_halts_without_rendering() {
        let mut m = machine(&HALT);
        assert_eq!(m.run_frame(), Ok(FrameState::Halted));
        assert!(m.is_halted());
        assert_eq!(m.frames, 0);
        assert!(m.framebuffer().iter().all(|&b| b == 0));

        // Terminal
        assert_eq!(m.run_frame(), Ok(FrameState::Halted));
        assert_eq!(m.run_headless(10), Ok(FrameState::Halted));
    }

    #[test]
    fn test_keys_latch_once_per_frame() {
        // Each frame stores KY into cell 100
        let program = [
            OP_CONST, KY_ADDR, OP_LOAD, OP_CONST, 100, OP_STOR, OP_SYNC, OP_JUMP, START,
        ];
        let mut m = machine(&program);
        let keypad = m.keypad();

        keypad.press(KEY_LF | KEY_B);
        m.run_frame().unwrap();
        // Latched at the end of frame one, visible from frame two
        assert_eq!(m.cpu().memory().words()[100], 0);

        keypad.release(KEY_B);
        m.run_frame().unwrap();
        assert_eq!(m.cpu().memory().words()[100], KEY_LF | KEY_B);

        m.run_frame().unwrap();
        assert_eq!(m.cpu().memory().words()[100], KEY_LF);
    }

    const KY_ADDR: i32 = PORT_KY as i32;

    #[test]
    fn test_audio_cursor_resets_each_frame() {
        let body = START + 3;
        let program = [
            OP_CONST, 666, OP_STR, // 667 passes
            OP_CONST, 0x80, OP_CONST, PORT_AU as i32, OP_STOR, // body
            OP_NEXT, body, OP_SYNC, OP_JUMP, START,
        ];
        let mut m = machine(&program);
        m.run_frame().unwrap();
        assert_eq!(m.audio().cursor(), 0);
        assert_eq!(m.audio().last_frame().len(), 667);
        assert!(m.audio().last_frame().iter().all(|&s| s == 0.5));

        m.run_frame().unwrap();
        assert_eq!(m.audio().cursor(), 0);
        assert_eq!(m.audio().last_frame().len(), 667);
    }

    #[test]
    fn test_default_rate_keeps_whole_frame() {
        let body = START + 3;
        let program = [
            OP_CONST, 666, OP_STR,
            OP_CONST, 0x80, OP_CONST, PORT_AU as i32, OP_STOR,
            OP_NEXT, body, OP_SYNC, OP_JUMP, START,
        ];
        let mut m = Machine::new(image(&program), &MachineConfig::default());
        m.run_frame().unwrap();
        assert_eq!(m.audio().multiplier(), 5);
        assert_eq!(m.audio().last_frame().len(), 667 * 5);
    }

    #[test]
    fn test_run_frame_into_sinks() {
        let program = [
            OP_CONST, 1, OP_CONST, PORT_AU as i32, OP_STOR, OP_SYNC, OP_JUMP, START,
        ];
        let mut m = machine(&program);
        let mut sink = Frames::default();
        for _ in 0..3 {
            let mut audio = Frames::default();
            assert_eq!(
                m.run_frame_into(&mut sink, &mut audio),
                Ok(FrameState::Running)
            );
            assert_eq!(audio.samples, vec![1]);
        }
        assert_eq!(sink.presented, 3);
    }

    #[test]
    fn test_headless_sync_is_fatal() {
        let mut m = machine(&[OP_CONST, 1, OP_SYNC]);
        assert_eq!(
            m.run_headless(100),
            Err(VmError::UnsupportedSync { pc: START + 2 })
        );
        assert!(m.is_halted());
    }

    #[test]
    fn test_headless_budget_and_halt() {
        let mut program = vec![OP_CONST, 7, OP_DROP];
        program.extend_from_slice(&HALT);
        let mut m = machine(&program);
        assert_eq!(m.run_headless(1), Ok(FrameState::Running));
        assert_eq!(m.run_headless(100), Ok(FrameState::Halted));
        assert_eq!(m.cpu().total_steps, 5);
    }

    #[test]
    fn test_headless_character_device() {
        // Echo one character from CO back to CO, then halt
        let mut program = vec![
            OP_CONST, PORT_CO as i32, OP_LOAD, OP_CONST, PORT_CO as i32, OP_STOR,
        ];
        program.extend_from_slice(&HALT);
        let mut m = machine(&program);
        let output = Rc::new(RefCell::new(Vec::new()));
        m.attach_console(Box::new(Recorder {
            input: vec!['x' as i32],
            output: Rc::clone(&output),
        }));

        assert_eq!(m.run_headless(1000), Ok(FrameState::Halted));
        assert_eq!(*output.borrow(), vec!['x' as i32]);
    }

    #[test]
    fn test_keyboard_queue_reads() {
        let mut program = vec![OP_CONST, PORT_KB as i32, OP_LOAD, OP_CONST, PORT_KB as i32, OP_LOAD];
        program.extend_from_slice(&HALT);
        let mut m = machine(&program);
        m.keypad().push_char('q' as i32);
        m.run_headless(1000).unwrap();

        let dp = m.cpu().memory().reg(REGISTER_DP) as usize;
        let words = m.cpu().memory().words();
        assert_eq!(&words[dp - 2..dp], &['q' as i32, -1]);
    }

    #[test]
    fn test_fault_halts_machine() {
        let mut m = machine(&[OP_CONST, 5000, OP_LOAD]);
        assert!(matches!(
            m.run_frame(),
            Err(VmError::OutOfBounds { addr: 5000, .. })
        ));
        assert!(m.is_halted());
        assert_eq!(m.run_frame(), Ok(FrameState::Halted));
    }
}
