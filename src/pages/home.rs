use leptos::prelude::*;
use log::{error, warn};

use crate::components::family_tree::{FamilyTreeCanvas, Gender, GraphSnapshot, PersonId};
use crate::store::{
	FEMALE_COLOR, FamilyStore, MALE_COLOR, Result as StoreResult, UNRELATED_COLOR,
};

const SAMPLE_FAMILY: &str = include_str!("../../assets/sample_family.json");

/// Store seeded with the bundled sample family.
fn load_sample() -> FamilyStore {
	match serde_json::from_str::<GraphSnapshot>(SAMPLE_FAMILY) {
		Ok(snapshot) => FamilyStore::from_snapshot(snapshot),
		Err(err) => {
			error!("bundled family data is invalid: {}", err);
			FamilyStore::default()
		}
	}
}

fn parse_gender(value: &str) -> Gender {
	if value.eq_ignore_ascii_case("female") {
		Gender::Female
	} else {
		Gender::Male
	}
}

/// Contents of a new-person form.
#[derive(Clone, Debug, PartialEq)]
struct PersonDraft {
	name: String,
	gender: Gender,
	description: String,
}

impl Default for PersonDraft {
	fn default() -> Self {
		Self {
			name: String::new(),
			gender: Gender::Male,
			description: String::new(),
		}
	}
}

impl PersonDraft {
	/// Add as a standalone person. Returns the stored name.
	fn add_to(&self, store: &mut FamilyStore) -> StoreResult<PersonId> {
		store.add_person(&self.name, self.gender, Some(self.description.as_str()))?;
		Ok(self.name.trim().to_string())
	}

	/// Add (or link, if they already exist) as a child of `parent`.
	fn add_child_to(&self, store: &mut FamilyStore, parent: &str) -> StoreResult<PersonId> {
		store.add_child(parent, &self.name, self.gender, Some(self.description.as_str()))?;
		Ok(self.name.trim().to_string())
	}
}

/// Name, gender and description inputs bound to a draft.
#[component]
fn PersonFields(draft: RwSignal<PersonDraft>, placeholder: &'static str) -> impl IntoView {
	view! {
		<input
			type="text"
			placeholder=placeholder
			prop:value=move || draft.with(|d| d.name.clone())
			on:input=move |ev| draft.update(|d| d.name = event_target_value(&ev))
		/>
		<select
			prop:value=move || draft.with(|d| d.gender.as_str())
			on:change=move |ev| draft.update(|d| d.gender = parse_gender(&event_target_value(&ev)))
		>
			<option value="Male">"Male"</option>
			<option value="Female">"Female"</option>
		</select>
		<textarea
			placeholder="Description (optional)"
			prop:value=move || draft.with(|d| d.description.clone())
			on:input=move |ev| draft.update(|d| d.description = event_target_value(&ev))
		/>
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let store = RwSignal::new(load_sample());
	let focused = RwSignal::new(None::<PersonId>);
	let selected = RwSignal::new(None::<PersonId>);
	let search = RwSignal::new(String::new());
	let results_open = RwSignal::new(false);
	let notice = RwSignal::new(None::<String>);

	let graph_data = Signal::derive(move || store.with(|s| s.snapshot()));
	let results = Memo::new(move |_| {
		if !results_open.get() {
			return Vec::new();
		}
		let term = search.get();
		store.with(|s| s.search(&term).into_iter().cloned().collect::<Vec<_>>())
	});

	// Shows the store's error, if any. True on success.
	let report = move |outcome: Option<StoreResult<PersonId>>| match outcome {
		Some(Err(err)) => {
			warn!("family update rejected: {}", err);
			notice.set(Some(err.to_string()));
			false
		}
		_ => {
			notice.set(None);
			true
		}
	};

	let choose = move |name: PersonId| {
		search.set(name.clone());
		results_open.set(false);
		focused.set(Some(name));
	};
	let clear_search = move |_: leptos::ev::MouseEvent| {
		search.set(String::new());
		results_open.set(false);
		focused.set(None);
	};
	let delete = move |name: PersonId| {
		let outcome = store.try_update(|s| s.delete_person(&name).map(|()| name.clone()));
		if report(outcome) {
			if selected.get_untracked().as_deref() == Some(name.as_str()) {
				selected.set(None);
			}
			if focused.get_untracked().as_deref() == Some(name.as_str()) {
				focused.set(None);
			}
		}
	};

	let adding_person = RwSignal::new(false);
	let person_draft = RwSignal::new(PersonDraft::default());
	let add_person = move |_: leptos::ev::MouseEvent| {
		let draft = person_draft.get_untracked();
		if report(store.try_update(|s| draft.add_to(s))) {
			person_draft.set(PersonDraft::default());
			adding_person.set(false);
		}
	};

	let linking = RwSignal::new(false);
	let link_parent = RwSignal::new(String::new());
	let link_child = RwSignal::new(String::new());
	let add_link = move |_: leptos::ev::MouseEvent| {
		let (parent, child) = (link_parent.get_untracked(), link_child.get_untracked());
		let outcome =
			store.try_update(|s| s.add_relationship(&parent, &child).map(|()| child.clone()));
		if report(outcome) {
			link_parent.set(String::new());
			link_child.set(String::new());
			linking.set(false);
		}
	};
	let person_options = move || {
		store.with(|s| {
			s.people()
				.iter()
				.map(|p| view! { <option value=p.id.clone()>{p.id.clone()}</option> })
				.collect_view()
		})
	};

	let child_draft = RwSignal::new(PersonDraft::default());
	let add_child = move |parent: PersonId| {
		let draft = child_draft.get_untracked();
		if report(store.try_update(|s| draft.add_child_to(s, &parent))) {
			child_draft.set(PersonDraft::default());
		}
	};

	let details = move || {
		let name = selected.get()?;
		store.with(|s| {
			let person = s.person(&name)?.clone();
			let parents: Vec<String> =
				s.parents_of(&name).into_iter().map(str::to_string).collect();
			let children: Vec<String> =
				s.children_of(&name).into_iter().map(str::to_string).collect();
			Some((person, parents, children))
		})
	};
	let unrelated_label = move || {
		let count = store.with(|s| s.without_relationships().len());
		format!("No relationships ({count})")
	};

	view! {
		<div class="family-app">
			<header class="toolbar">
				<h1>"Family Tree"</h1>
				<div class="search">
					<input
						type="text"
						placeholder="Search family members..."
						prop:value=move || search.get()
						on:input=move |ev| {
							let term = event_target_value(&ev);
							if term.trim().is_empty() {
								focused.set(None);
							}
							search.set(term);
							results_open.set(true);
						}
					/>
					<Show when=move || !search.get().is_empty()>
						<button class="clear" on:click=clear_search>"×"</button>
					</Show>
					<ul class="search-results">
						{move || {
							results
								.get()
								.into_iter()
								.map(|person| {
									let name = person.id.clone();
									view! {
										<li on:click=move |_| choose(name.clone())>
											<strong>{person.id.clone()}</strong>
											<span>{person.gender.as_str()}</span>
										</li>
									}
								})
								.collect_view()
						}}
					</ul>
				</div>
				<button on:click=move |_| adding_person.update(|open| *open = !*open)>
					"Add Person"
				</button>
				<button on:click=move |_| linking.update(|open| *open = !*open)>
					"Add Relationship"
				</button>
			</header>

			{move || notice.get().map(|msg| view! { <p class="notice">{msg}</p> })}

			<Show when=move || adding_person.get()>
				<section class="form add-person">
					<h2>"Add Person"</h2>
					<PersonFields draft=person_draft placeholder="Full name" />
					<button on:click=add_person>"Add Person"</button>
					<button on:click=move |_| adding_person.set(false)>"Cancel"</button>
				</section>
			</Show>

			<Show when=move || linking.get()>
				<section class="form add-relationship">
					<h2>"Add Relationship"</h2>
					<label>
						"Parent"
						<select
							prop:value=move || link_parent.get()
							on:change=move |ev| link_parent.set(event_target_value(&ev))
						>
							<option value="">"Select parent"</option>
							{person_options}
						</select>
					</label>
					<label>
						"Child"
						<select
							prop:value=move || link_child.get()
							on:change=move |ev| link_child.set(event_target_value(&ev))
						>
							<option value="">"Select child"</option>
							{person_options}
						</select>
					</label>
					<button on:click=add_link>"Add Relationship"</button>
					<button on:click=move |_| linking.set(false)>"Cancel"</button>
				</section>
			</Show>

			<Show
				when=move || store.with(|s| !s.people().is_empty())
				fallback=move || {
					view! {
						<section class="empty-state">
							<h2>"No family members yet"</h2>
							<p>"Start building your family tree by adding the first person."</p>
							<button on:click=move |_| adding_person.set(true)>
								"Add First Person"
							</button>
						</section>
					}
				}
			>
				<section class="tree-container" style="height: 60vh; min-height: 600px;">
					<FamilyTreeCanvas
						data=graph_data
						focused=focused
						color_for=move |id: PersonId| store.with(|s| s.color_for(&id).to_string())
						on_node_activated=move |id: PersonId| selected.set(Some(id))
					/>
				</section>
			</Show>
			<div class="legend">
				<span style=format!("background: {MALE_COLOR}")>"Male"</span>
				<span style=format!("background: {FEMALE_COLOR}")>"Female"</span>
				<span style=format!("background: {UNRELATED_COLOR}")>{unrelated_label}</span>
				<span>"→ Parent to Child"</span>
			</div>

			<section class="people">
				<h2>{move || format!("Family Members ({})", store.with(|s| s.people().len()))}</h2>
				<ul>
					{move || {
						store
							.with(|s| {
								s.people()
									.iter()
									.map(|p| {
										let name = p.id.clone();
										let style = format!(
											"background-color: {}",
											s.color_for(&p.id),
										);
										view! {
											<li
												style=style
												on:click=move |_| selected.set(Some(name.clone()))
											>
												<strong>{p.id.clone()}</strong>
												<span>{p.gender.as_str()}</span>
											</li>
										}
									})
									.collect_view()
							})
					}}
				</ul>
			</section>

			{move || {
				details()
					.map(|(person, parents, children)| {
						let (for_delete, for_child) = (person.id.clone(), person.id.clone());
						let no_parents = parents.is_empty();
						let no_children = children.is_empty();
						view! {
							<aside class="person-sidebar">
								<button class="close" on:click=move |_| selected.set(None)>
									"×"
								</button>
								<h2>{person.id.clone()}</h2>
								<p>"Gender: " {person.gender.as_str()}</p>
								{person
									.description
									.clone()
									.map(|d| view! { <p class="desc">{d}</p> })}
								<h3>{format!("Parents ({})", parents.len())}</h3>
								<Show when=move || no_parents>
									<p class="muted">"No parents recorded"</p>
								</Show>
								<ul>
									{parents
										.into_iter()
										.map(|p| view! { <li>{p}</li> })
										.collect_view()}
								</ul>
								<h3>{format!("Children ({})", children.len())}</h3>
								<Show when=move || no_children>
									<p class="muted">"No children recorded"</p>
								</Show>
								<ul>
									{children
										.into_iter()
										.map(|c| view! { <li>{c}</li> })
										.collect_view()}
								</ul>
								<div class="add-child">
									<PersonFields draft=child_draft placeholder="Child's name" />
									<button on:click=move |_| add_child(for_child.clone())>
										"Add Child"
									</button>
								</div>
								<button class="danger" on:click=move |_| delete(for_delete.clone())>
									"Delete"
								</button>
							</aside>
						}
					})
			}}
		</div>
	}
}
