use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use crate::coords::IntRect;

use super::gpu::{
    Gpu, GpuBlend, GpuPrimitive, GpuStateSnapshot, ProgramHandle, TextureBinding, VertexBinding,
};

/// One command as issued to the device.
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCommand {
    /// The context became current (not logged when it already was).
    Activate,
    Deactivate,
    Clear { color: u32, depth: u32 },
    SetViewport(IntRect),
    SetProjection([f32; 16]),
    SetModelview([f32; 16]),
    SetBlend(GpuBlend),
    BindTexture(Option<TextureBinding>),
    SetTextureMatrix([f32; 16]),
    BindShader(Option<ProgramHandle>),
    SetVertexBuffer(VertexBinding),
    DrawArrays { primitive: GpuPrimitive, first: u32, count: u32 },
    RestoreState,
}

impl GpuCommand {
    /// True for commands that change render state (not activation, clears or draws).
    pub fn is_state_change(&self) -> bool {
        !matches!(
            self,
            GpuCommand::Activate
                | GpuCommand::Deactivate
                | GpuCommand::Clear { .. }
                | GpuCommand::DrawArrays { .. }
        )
    }
}

/// Recorder configuration.
#[derive(Debug, Clone)]
pub struct RecorderInit {
    /// Report shader support from `shaders_supported`.
    pub shaders_supported: bool,

    /// Start with activation failing.
    pub activation_fails: bool,
}

impl Default for RecorderInit {
    fn default() -> Self {
        Self {
            shaders_supported: true,
            activation_fails: false,
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    commands: RefCell<Vec<GpuCommand>>,
    activation_fails: Cell<bool>,
}

/// Shared view of a recorder's command stream.
///
/// Cheap to clone; every clone observes the same stream. The recorder itself
/// usually moves into a render target, so callers keep one of these to
/// inspect what was issued.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    shared: Rc<Shared>,
}

impl CommandLog {
    pub fn commands(&self) -> Ref<'_, Vec<GpuCommand>> {
        self.shared.commands.borrow()
    }

    pub fn len(&self) -> usize {
        self.shared.commands.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.commands.borrow().is_empty()
    }

    /// Drops recorded commands. The device state is untouched.
    pub fn clear(&self) {
        self.shared.commands.borrow_mut().clear();
    }

    /// Takes the recorded commands, leaving the log empty.
    pub fn take(&self) -> Vec<GpuCommand> {
        std::mem::take(&mut *self.shared.commands.borrow_mut())
    }

    pub fn count(&self, pred: impl Fn(&GpuCommand) -> bool) -> usize {
        self.shared.commands.borrow().iter().filter(|&c| pred(c)).count()
    }

    pub fn draw_count(&self) -> usize {
        self.count(|c| matches!(c, GpuCommand::DrawArrays { .. }))
    }

    pub fn state_change_count(&self) -> usize {
        self.count(GpuCommand::is_state_change)
    }

    /// Makes subsequent `activate(true)` calls fail (or succeed again).
    pub fn set_activation_fails(&self, fails: bool) {
        self.shared.activation_fails.set(fails);
    }

    fn push(&self, cmd: GpuCommand) {
        self.shared.commands.borrow_mut().push(cmd);
    }
}

/// Headless [`Gpu`] that records commands and tracks the resulting state.
#[derive(Debug)]
pub struct CommandRecorder {
    log: CommandLog,
    shaders_supported: bool,
    active: bool,
    state: GpuStateSnapshot,
}

impl CommandRecorder {
    pub fn new(init: RecorderInit) -> Self {
        let log = CommandLog::default();
        log.set_activation_fails(init.activation_fails);
        Self {
            log,
            shaders_supported: init.shaders_supported,
            active: false,
            state: GpuStateSnapshot::default(),
        }
    }

    /// Handle onto the command stream.
    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }

    /// Current device state as seen by the recorder.
    pub fn state(&self) -> &GpuStateSnapshot {
        &self.state
    }
}

impl Default for CommandRecorder {
    fn default() -> Self {
        Self::new(RecorderInit::default())
    }
}

impl Gpu for CommandRecorder {
    fn activate(&mut self, active: bool) -> bool {
        if !active {
            if self.active {
                self.active = false;
                self.log.push(GpuCommand::Deactivate);
            }
            return true;
        }

        if self.log.shared.activation_fails.get() {
            self.active = false;
            return false;
        }

        if !self.active {
            self.active = true;
            self.log.push(GpuCommand::Activate);
        }
        true
    }

    fn shaders_supported(&self) -> bool {
        self.shaders_supported
    }

    fn clear(&mut self, color: u32, depth: u32) {
        self.log.push(GpuCommand::Clear { color, depth });
    }

    fn set_viewport(&mut self, viewport: IntRect) {
        self.state.viewport = Some(viewport);
        self.log.push(GpuCommand::SetViewport(viewport));
    }

    fn set_projection(&mut self, matrix: &[f32; 16]) {
        self.state.projection = *matrix;
        self.log.push(GpuCommand::SetProjection(*matrix));
    }

    fn set_modelview(&mut self, matrix: &[f32; 16]) {
        self.state.modelview = *matrix;
        self.log.push(GpuCommand::SetModelview(*matrix));
    }

    fn set_blend(&mut self, blend: GpuBlend) {
        self.state.blend = Some(blend);
        self.log.push(GpuCommand::SetBlend(blend));
    }

    fn bind_texture(&mut self, texture: Option<TextureBinding>) {
        self.state.texture = texture;
        self.log.push(GpuCommand::BindTexture(texture));
    }

    fn set_texture_matrix(&mut self, matrix: &[f32; 16]) {
        self.state.texture_matrix = *matrix;
        self.log.push(GpuCommand::SetTextureMatrix(*matrix));
    }

    fn bind_shader(&mut self, program: Option<ProgramHandle>) {
        self.state.shader = program;
        self.log.push(GpuCommand::BindShader(program));
    }

    fn set_vertex_buffer(&mut self, binding: VertexBinding) {
        self.state.vertex_buffer = Some(binding);
        self.log.push(GpuCommand::SetVertexBuffer(binding));
    }

    fn draw_arrays(&mut self, primitive: GpuPrimitive, first: u32, count: u32) {
        self.log.push(GpuCommand::DrawArrays { primitive, first, count });
    }

    fn capture_state(&self) -> GpuStateSnapshot {
        self.state.clone()
    }

    fn restore_state(&mut self, snapshot: &GpuStateSnapshot) {
        self.state = snapshot.clone();
        self.log.push(GpuCommand::RestoreState);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activate_is_logged_once_while_current() {
        let mut gpu = CommandRecorder::default();
        let log = gpu.log();
        assert!(gpu.activate(true));
        assert!(gpu.activate(true));
        assert_eq!(*log.commands(), vec![GpuCommand::Activate]);
    }

    #[test]
    fn failing_activation_reports_false() {
        let mut gpu = CommandRecorder::new(RecorderInit {
            activation_fails: true,
            ..Default::default()
        });
        assert!(!gpu.activate(true));
        gpu.log().set_activation_fails(false);
        assert!(gpu.activate(true));
    }

    #[test]
    fn restore_replaces_tracked_state() {
        let mut gpu = CommandRecorder::default();
        let saved = gpu.capture_state();
        gpu.bind_shader(Some(ProgramHandle(3)));
        gpu.set_viewport(IntRect::new(0, 0, 10, 10));
        gpu.restore_state(&saved);
        assert_eq!(gpu.state(), &saved);
    }

    #[test]
    fn state_changes_exclude_draws_and_clears() {
        let mut gpu = CommandRecorder::default();
        let log = gpu.log();
        gpu.clear(0, 0);
        gpu.draw_arrays(GpuPrimitive::Triangles, 0, 3);
        gpu.bind_texture(None);
        assert_eq!(log.state_change_count(), 1);
        assert_eq!(log.draw_count(), 1);
    }
}
