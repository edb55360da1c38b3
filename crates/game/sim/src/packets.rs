use game_core::{EnvError, PacketSender, Position, SkillId, UnitId};

use crate::world::{InputAction, PacketRequest, SimWorld};

impl SimWorld {
    fn packet<R>(
        &self,
        request: PacketRequest,
        apply: impl FnOnce(&mut crate::world::WorldState) -> R,
    ) -> Result<R, EnvError> {
        let mut state = self.state();
        state.record(InputAction::Packet(request.clone()));
        if state.reject_packets {
            return Err(EnvError::PacketRejected(format!("{request:?}")));
        }
        Ok(apply(&mut state))
    }
}

/// Packets act without range limits. Requests that do not apply (unknown
/// unit, used object) are accepted and ignored, as the game server does.
impl PacketSender for SimWorld {
    fn interact(&self, object: UnitId) -> Result<(), EnvError> {
        self.packet(PacketRequest::Interact(object), |state| {
            state.interact(object);
        })
    }

    fn cast_skill_at_unit(&self, skill: SkillId, target: UnitId) -> Result<(), EnvError> {
        self.packet(PacketRequest::CastAtUnit(skill, target), |state| {
            state.hit(target);
        })
    }

    fn cast_skill_at(&self, skill: SkillId, position: Position) -> Result<(), EnvError> {
        self.packet(PacketRequest::CastAt(skill, position), |state| {
            if skill == SkillId::TELEPORT {
                state.teleport_to(position);
            }
        })
    }

    fn pick_up(&self, item: UnitId) -> Result<(), EnvError> {
        self.packet(PacketRequest::PickUp(item), |state| {
            state.pick_up(item);
        })
    }
}
