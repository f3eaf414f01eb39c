use {
	crate::{
		events::{Event, EventCategory},
		http::{
			AppState,
			error::{HandlerError, HandlerResult},
			extract::{CurrentUser, Json, Path, Query},
			problem_details::ProblemType,
		},
		links::{self, Link, LinkDetails, LinkFilter, LinkId, LinkOrder, NewLink},
		users::{self, EmailAddress, Password, User, UserId, UserProfile, Username},
		votes::{self, Vote},
	},
	axum::{
		extract::State,
		response::{
			IntoResponse,
			Response,
			Sse,
			sse::{self, KeepAlive},
		},
	},
	futures_util::StreamExt,
	serde::{Deserialize, Serialize},
	std::convert::Infallible,
};

//=================================================================================================
// `/signup` & `/login`

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SignupRequest
{
	name: Username,
	email: EmailAddress,
	password: Password,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LoginRequest
{
	email: EmailAddress,
	password: Password,
}

/// Returned after signing up or logging in.
#[derive(Debug, Serialize)]
pub(crate) struct AuthPayload
{
	token: String,
	user: User,
}

#[tracing::instrument(skip(state), err(Debug, level = "debug"))]
pub(crate) async fn signup(
	State(state): State<AppState>,
	Json(SignupRequest { name, email, password }): Json<SignupRequest>,
) -> HandlerResult<(http::StatusCode, Json<AuthPayload>)>
{
	let password_hash = password.hash(state.password_cost).await?;
	let user = users::create(&state.database, &name, &email, &password_hash).await?;
	let token = issue_token(&state, user.id)?;

	info!(user.id = %user.id, "user signed up");

	Ok((http::StatusCode::CREATED, Json(AuthPayload { token, user })))
}

#[tracing::instrument(skip(state), err(Debug, level = "debug"))]
pub(crate) async fn login(
	State(state): State<AppState>,
	Json(LoginRequest { email, password }): Json<LoginRequest>,
) -> HandlerResult<Json<AuthPayload>>
{
	let Some((user, password_hash)) = users::get_credentials(&state.database, &email).await?
	else {
		return Err(ProblemType::InvalidCredentials.into());
	};

	if !password.verify(password_hash).await? {
		return Err(ProblemType::InvalidCredentials.into());
	}

	let token = issue_token(&state, user.id)?;

	Ok(Json(AuthPayload { token, user }))
}

fn issue_token(state: &AppState, user_id: UserId) -> HandlerResult<String>
{
	state.jwt.encode(user_id).map_err(|err| {
		error!(error = &err as &dyn std::error::Error, "failed to issue token");
		HandlerError::Internal
	})
}

//=================================================================================================
// `/links`

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct GetLinksQuery
{
	/// Every term must match.
	#[serde(default)]
	and: Vec<String>,

	/// Any term may match.
	#[serde(default)]
	or: Vec<String>,

	#[serde(default)]
	skip: u64,

	first: Option<u64>,
	order_by: Option<LinkOrder>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LinksMeta
{
	count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PostLinkRequest
{
	description: String,
	url: String,
}

#[tracing::instrument(skip(state), err(Debug, level = "debug"))]
pub(crate) async fn get_links(
	State(state): State<AppState>,
	Query(query): Query<GetLinksQuery>,
) -> HandlerResult<Json<Vec<Link>>>
{
	let filter = LinkFilter::builder()
		.all_terms(query.and)
		.any_terms(query.or)
		.skip(query.skip)
		.maybe_first(query.first)
		.maybe_order(query.order_by)
		.build();

	Ok(Json(links::get(&state.database, &filter).await?))
}

#[tracing::instrument(skip(state), err(Debug, level = "debug"))]
pub(crate) async fn get_links_meta(State(state): State<AppState>) -> HandlerResult<Json<LinksMeta>>
{
	let count = links::count(&state.database).await?;

	Ok(Json(LinksMeta { count }))
}

#[tracing::instrument(skip(state), err(Debug, level = "debug"))]
pub(crate) async fn get_link(
	State(state): State<AppState>,
	Path(link_id): Path<LinkId>,
) -> HandlerResult<Json<LinkDetails>>
{
	links::get_details(&state.database, link_id)
		.await?
		.map(Json)
		.ok_or(HandlerError::NotFound)
}

#[tracing::instrument(skip(state), err(Debug, level = "debug"))]
pub(crate) async fn post_link(
	State(state): State<AppState>,
	CurrentUser(user): CurrentUser,
	Json(PostLinkRequest { description, url }): Json<PostLinkRequest>,
) -> HandlerResult<(http::StatusCode, Json<Link>)>
{
	let new_link = NewLink::new(&description, &url)?;
	let link = links::create(&state.database, &new_link, user.id).await?;

	state.events.publish(Event::link_created(link.clone()));

	Ok((http::StatusCode::CREATED, Json(link)))
}

#[tracing::instrument(skip(state), err(Debug, level = "debug"))]
pub(crate) async fn upvote(
	State(state): State<AppState>,
	CurrentUser(user): CurrentUser,
	Path(link_id): Path<LinkId>,
) -> HandlerResult<(http::StatusCode, Json<Vote>)>
{
	let vote = votes::create(&state.database, link_id, user.id).await?;

	state.events.publish(Event::vote_cast(vote.clone()));

	Ok((http::StatusCode::CREATED, Json(vote)))
}

//=================================================================================================
// `/users`

#[tracing::instrument(skip(state), err(Debug, level = "debug"))]
pub(crate) async fn get_user(
	State(state): State<AppState>,
	Path(user_id): Path<UserId>,
) -> HandlerResult<Json<UserProfile>>
{
	users::get_profile(&state.database, user_id)
		.await?
		.map(Json)
		.ok_or(HandlerError::NotFound)
}

//=================================================================================================
// `/subscriptions`

#[tracing::instrument(skip(state), err(Debug, level = "debug"))]
pub(crate) async fn subscribe_links(State(state): State<AppState>) -> HandlerResult<Response>
{
	subscribe(state, EventCategory::LinkCreated).await
}

#[tracing::instrument(skip(state), err(Debug, level = "debug"))]
pub(crate) async fn subscribe_votes(State(state): State<AppState>) -> HandlerResult<Response>
{
	subscribe(state, EventCategory::VoteCast).await
}

/// Streams events of `category` as SSE until the client disconnects or the
/// server shuts down.
async fn subscribe(state: AppState, category: EventCategory) -> HandlerResult<Response>
{
	let cancellation_token = state.shutdown_token.child_token();
	let subscription = state
		.events
		.subscribe(category, cancellation_token.clone())
		.await?;

	info!(subscriber.id = %subscription.id(), %category, "opened subscription");

	// dropping the response body cancels the subscription
	let drop_guard = cancellation_token.drop_guard();
	let events = subscription.into_stream().map(move |event| {
		let _guard = &drop_guard;
		let sse_event = sse::Event::default()
			.event(event.category().as_str())
			.id(event.id().as_str())
			.json_data(&*event)
			.unwrap_or_else(|err| {
				error!(error = &err as &dyn std::error::Error, "failed to serialize event");
				sse::Event::default().comment("dropped event")
			});

		Ok::<_, Infallible>(sse_event)
	});

	let sse = Sse::new(events).keep_alive(KeepAlive::new().interval(state.keep_alive_interval));

	Ok(sse.into_response())
}
