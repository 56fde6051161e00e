//! Room service
//!
//! Room lifecycle: create, join (invite codes), leave (last one out deletes
//! the room), rename, delete, invite code rotation and member listing.

use chat_core::entities::{validate_room_name, Role, Room, RoomMember, User};
use chat_core::{generate_invite_code, DomainError, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{
    CreateRoomRequest, JoinRoomRequest, LeaveRoomResponse, RoomResponse, RoomWithMeta,
    UpdateRoomRequest, UserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Attempts at drawing an unused invite code before giving up
const INVITE_CODE_ATTEMPTS: usize = 10;

/// Room service
pub struct RoomService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoomService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Public rooms plus the private rooms the caller belongs to
    #[instrument(skip(self))]
    pub async fn list_rooms(&self, user_id: Snowflake) -> ServiceResult<Vec<RoomResponse>> {
        let user = self.load_user(user_id).await?;
        let rooms = self.ctx.room_repo().find_visible(user_id).await?;

        let mut responses = Vec::with_capacity(rooms.len());
        for room in rooms {
            responses.push(self.to_response(room, &user).await?);
        }
        Ok(responses)
    }

    /// Create a room; the creator becomes its first member
    #[instrument(skip(self, request))]
    pub async fn create_room(
        &self,
        creator_id: Snowflake,
        request: CreateRoomRequest,
    ) -> ServiceResult<RoomResponse> {
        let creator = self.load_user(creator_id).await?;
        let name = validate_room_name(&request.name)?;

        let room = if request.is_public {
            let room = Room::new_public(self.ctx.generate_id(), name, creator_id);
            self.ctx.room_repo().create(&room).await?;
            room
        } else {
            self.create_private(name, creator_id).await?
        };

        self.ctx
            .member_repo()
            .add(&RoomMember::new(room.id, creator_id))
            .await?;

        info!(room_id = %room.id, is_public = room.is_public(), "Room created");

        self.to_response(room, &creator).await
    }

    /// Room detail. Private rooms are hidden from non-members below admin.
    #[instrument(skip(self))]
    pub async fn get_room(&self, room_id: Snowflake, user_id: Snowflake) -> ServiceResult<RoomResponse> {
        let user = self.load_user(user_id).await?;
        let room = self.load_room(room_id).await?;

        if !room.is_public()
            && !user.role.satisfies(Role::Admin)
            && !self.ctx.member_repo().is_member(room_id, user_id).await?
        {
            return Err(DomainError::RoomNotFound(room_id).into());
        }

        self.to_response(room, &user).await
    }

    /// Join a room. Idempotent for existing members.
    #[instrument(skip(self, request))]
    pub async fn join_room(
        &self,
        room_id: Snowflake,
        user_id: Snowflake,
        request: JoinRoomRequest,
    ) -> ServiceResult<RoomResponse> {
        let user = self.load_user(user_id).await?;
        let room = self.load_room(room_id).await?;

        if !self.ctx.member_repo().is_member(room_id, user_id).await? {
            room.check_join(request.invite_code.as_deref(), user.role)
                .inspect_err(|e| warn!(room_id = %room_id, user_id = %user_id, code = e.code(), "Join refused"))?;

            self.ctx
                .member_repo()
                .add(&RoomMember::new(room_id, user_id))
                .await?;

            info!(room_id = %room_id, user_id = %user_id, "User joined room");
        }

        self.to_response(room, &user).await
    }

    /// Leave a room, deleting it if nobody is left
    #[instrument(skip(self))]
    pub async fn leave_room(
        &self,
        room_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<LeaveRoomResponse> {
        self.load_room(room_id).await?;

        if !self.ctx.member_repo().remove(room_id, user_id).await? {
            return Err(DomainError::NotRoomMember.into());
        }
        self.ctx.typing().stop(room_id, user_id);
        self.ctx.mention_repo().clear_room(user_id, room_id).await?;

        let room_deleted = self.ctx.room_repo().delete_if_empty(room_id).await?;

        info!(room_id = %room_id, user_id = %user_id, room_deleted, "User left room");

        Ok(LeaveRoomResponse { room_deleted })
    }

    /// Rename a room (creator or admin+)
    #[instrument(skip(self, request))]
    pub async fn rename_room(
        &self,
        room_id: Snowflake,
        actor_id: Snowflake,
        request: UpdateRoomRequest,
    ) -> ServiceResult<RoomResponse> {
        let actor = self.load_user(actor_id).await?;
        let mut room = self.load_room(room_id).await?;
        room.ensure_manageable_by(actor.id, actor.role)?;

        let name = validate_room_name(&request.name)?;
        room.rename(name);
        self.ctx.room_repo().update(&room).await?;

        info!(room_id = %room_id, "Room renamed");

        self.to_response(room, &actor).await
    }

    /// Delete a room (creator or admin+)
    #[instrument(skip(self))]
    pub async fn delete_room(&self, room_id: Snowflake, actor_id: Snowflake) -> ServiceResult<()> {
        let actor = self.load_user(actor_id).await?;
        let room = self.load_room(room_id).await?;
        room.ensure_manageable_by(actor.id, actor.role)?;

        self.ctx.room_repo().delete(room_id).await?;

        info!(room_id = %room_id, actor_id = %actor_id, "Room deleted");
        Ok(())
    }

    /// Replace a private room's invite code (creator or admin+)
    #[instrument(skip(self))]
    pub async fn regenerate_invite_code(
        &self,
        room_id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<RoomResponse> {
        let actor = self.load_user(actor_id).await?;
        let mut room = self.load_room(room_id).await?;
        room.ensure_manageable_by(actor.id, actor.role)?;

        for _ in 0..INVITE_CODE_ATTEMPTS {
            room.rotate_invite_code(generate_invite_code())?;
            match self.ctx.room_repo().update(&room).await {
                Ok(()) => {
                    info!(room_id = %room_id, "Invite code regenerated");
                    return self.to_response(room, &actor).await;
                }
                Err(DomainError::InviteCodeExists) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::internal("could not allocate a unique invite code"))
    }

    /// Users in the room (members only)
    #[instrument(skip(self))]
    pub async fn list_members(
        &self,
        room_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<UserResponse>> {
        self.require_member(room_id, user_id).await?;

        let users = self.ctx.member_repo().list_users(room_id).await?;
        Ok(users.iter().map(UserResponse::from).collect())
    }

    /// Load the caller, failing unless they belong to the room
    pub(crate) async fn require_member(
        &self,
        room_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<User> {
        self.load_room(room_id).await?;
        if !self.ctx.member_repo().is_member(room_id, user_id).await? {
            return Err(DomainError::NotRoomMember.into());
        }
        self.load_user(user_id).await
    }

    /// Members pass; non-members of a public room are joined implicitly.
    pub(crate) async fn ensure_access(&self, room: &Room, user_id: Snowflake) -> ServiceResult<()> {
        if self.ctx.member_repo().is_member(room.id, user_id).await? {
            return Ok(());
        }
        if !room.is_public() {
            return Err(DomainError::NotRoomMember.into());
        }

        if self
            .ctx
            .member_repo()
            .add(&RoomMember::new(room.id, user_id))
            .await?
        {
            info!(room_id = %room.id, user_id = %user_id, "User auto-joined public room");
        }
        Ok(())
    }

    pub(crate) async fn load_room(&self, room_id: Snowflake) -> ServiceResult<Room> {
        self.ctx
            .room_repo()
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| DomainError::RoomNotFound(room_id).into())
    }

    async fn load_user(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id).into())
    }

    async fn create_private(&self, name: String, creator_id: Snowflake) -> ServiceResult<Room> {
        for _ in 0..INVITE_CODE_ATTEMPTS {
            let room = Room::new_private(
                self.ctx.generate_id(),
                name.clone(),
                creator_id,
                generate_invite_code(),
            );
            match self.ctx.room_repo().create(&room).await {
                Ok(()) => return Ok(room),
                Err(DomainError::InviteCodeExists) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::internal("could not allocate a unique invite code"))
    }

    async fn to_response(&self, room: Room, viewer: &User) -> ServiceResult<RoomResponse> {
        let member_count = self.ctx.member_repo().count(room.id).await?;
        let is_member = self.ctx.member_repo().is_member(room.id, viewer.id).await?;
        let show_code = is_member || room.can_be_managed_by(viewer.id, viewer.role);

        Ok(RoomResponse::from(RoomWithMeta {
            room,
            member_count,
            is_member,
            show_code,
        }))
    }
}
