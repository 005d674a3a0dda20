//! Client-side state container.
//!
//! Holds the normalized collections fetched from the upstream API. Layout
//! flags are per operator and live in the session instead. Every mutation is an [`Action`] applied
//! through [`Store::apply`]; there is no other write path. The store lives
//! behind a `tokio::sync::RwLock` in `AppState`, so each action is atomic with
//! respect to concurrent requests and the last writer wins.

pub mod collection;

use tracing::debug;

pub use collection::Collection;

use crate::models::{
    AccessRole, Client, InterviewRound, Job, Resource, Role, User, Vendor,
};

#[derive(Debug, Clone)]
pub enum Action {
    SetClients(Vec<Client>),
    AddClient(Client),
    UpdateClient(Client),
    DeleteClient(String),

    SetVendors(Vec<Vendor>),
    AddVendor(Vendor),
    UpdateVendor(Vendor),
    DeleteVendor(String),

    SetJobs(Vec<Job>),
    AddJob(Job),
    UpdateJob(Job),
    DeleteJob(String),

    SetResources(Vec<Resource>),
    AddResource(Resource),
    UpdateResource(Resource),
    DeleteResource(String),

    /// Replaces the rounds of one resource, leaving other resources' rounds alone.
    SetRounds {
        resource_id: String,
        rounds: Vec<InterviewRound>,
    },
    AddRound(InterviewRound),
    UpdateRound(InterviewRound),
    DeleteRound(String),

    SetRoles(Vec<Role>),
    AddRole(Role),
    UpdateRole(Role),
    DeleteRole(String),

    SetUsers(Vec<User>),
    UpdateUser(User),
    /// Adds roles to a user's current set (assignment is additive upstream).
    GrantRoles {
        user_id: String,
        roles: Vec<AccessRole>,
    },
}

#[derive(Debug, Default)]
pub struct Store {
    clients: Collection<Client>,
    vendors: Collection<Vendor>,
    jobs: Collection<Job>,
    resources: Collection<Resource>,
    rounds: Collection<InterviewRound>,
    roles: Collection<Role>,
    users: Collection<User>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clients(&self) -> &Collection<Client> {
        &self.clients
    }

    pub fn vendors(&self) -> &Collection<Vendor> {
        &self.vendors
    }

    pub fn jobs(&self) -> &Collection<Job> {
        &self.jobs
    }

    pub fn resources(&self) -> &Collection<Resource> {
        &self.resources
    }

    pub fn rounds(&self) -> &Collection<InterviewRound> {
        &self.rounds
    }

    pub fn roles(&self) -> &Collection<Role> {
        &self.roles
    }

    pub fn users(&self) -> &Collection<User> {
        &self.users
    }

    /// Rounds of one resource ordered by round number.
    pub fn rounds_for(&self, resource_id: &str) -> Vec<&InterviewRound> {
        let mut rounds: Vec<_> = self
            .rounds
            .iter()
            .filter(|r| r.resource_id == resource_id)
            .collect();
        rounds.sort_by_key(|r| r.round_number);
        rounds
    }

    /// Number the next round of a resource should carry.
    pub fn next_round_number(&self, resource_id: &str) -> u32 {
        let highest = self
            .rounds
            .iter()
            .filter(|r| r.resource_id == resource_id)
            .map(|r| r.round_number)
            .max()
            .unwrap_or(0);
        let counted = self
            .resources
            .get(resource_id)
            .map(|r| r.rounds_count)
            .unwrap_or(0);
        highest.max(counted) + 1
    }

    pub fn apply(&mut self, action: Action) {
        debug!(?action, "store action");
        match action {
            Action::SetClients(list) => self.clients.replace(list),
            Action::AddClient(client) => self.clients.add(client),
            Action::UpdateClient(client) => {
                let label = client.display_name().to_string();
                let id = client.id.clone();
                if self.clients.update(client) {
                    self.rename_client(&id, &label);
                }
            }
            Action::DeleteClient(id) => {
                self.clients.delete(&id);
            }

            Action::SetVendors(list) => self.vendors.replace(list),
            Action::AddVendor(vendor) => self.vendors.add(vendor),
            Action::UpdateVendor(vendor) => {
                let label = vendor.display_name().to_string();
                let id = vendor.id.clone();
                if self.vendors.update(vendor) {
                    for r in self.resources.iter_mut() {
                        if r.vendor_id.as_deref() == Some(id.as_str()) {
                            r.vendor_name = Some(label.clone());
                        }
                    }
                }
            }
            Action::DeleteVendor(id) => {
                self.vendors.delete(&id);
            }

            Action::SetJobs(list) => self.jobs.replace(list),
            Action::AddJob(mut job) => {
                self.fill_job_names(&mut job);
                if let Some(client) = self.clients.get_mut(&job.client_id) {
                    client.jobs_count += 1;
                }
                self.jobs.add(job);
            }
            Action::UpdateJob(mut job) => {
                let previous_client = self.jobs.get(&job.id).map(|j| j.client_id.clone());
                self.fill_job_names(&mut job);
                let snapshot = job.clone();
                if self.jobs.update(job) {
                    if let Some(from) = previous_client.filter(|c| *c != snapshot.client_id) {
                        self.move_job(&snapshot.id, &from, &snapshot.client_id);
                    }
                    for r in self.resources.iter_mut() {
                        if r.job_id == snapshot.id {
                            r.job_title = snapshot.title.clone();
                            r.client_id = snapshot.client_id.clone();
                            r.client_name = snapshot.client_name.clone();
                        }
                    }
                }
            }
            Action::DeleteJob(id) => {
                if let Some(job) = self.jobs.delete(&id) {
                    if let Some(client) = self.clients.get_mut(&job.client_id) {
                        client.jobs_count = client.jobs_count.saturating_sub(1);
                    }
                }
            }

            Action::SetResources(list) => self.resources.replace(list),
            Action::AddResource(mut resource) => {
                self.fill_resource_names(&mut resource);
                self.adjust_resource_counts(&resource, true);
                self.resources.add(resource);
            }
            Action::UpdateResource(mut resource) => {
                let previous = self.resources.get(&resource.id).cloned();
                self.fill_resource_names(&mut resource);
                if let Some(previous) = previous {
                    let moved = previous.job_id != resource.job_id
                        || previous.client_id != resource.client_id
                        || previous.vendor_id != resource.vendor_id;
                    if moved {
                        self.adjust_resource_counts(&previous, false);
                        self.adjust_resource_counts(&resource, true);
                    }
                }
                self.resources.update(resource);
            }
            Action::DeleteResource(id) => {
                if let Some(resource) = self.resources.delete(&id) {
                    self.adjust_resource_counts(&resource, false);
                    self.rounds.retain(|r| r.resource_id != id);
                }
            }

            Action::SetRounds { resource_id, rounds } => {
                self.rounds.retain(|r| r.resource_id != resource_id);
                let count = rounds.len() as u32;
                let current = rounds.iter().map(|r| r.round_number).max();
                for round in rounds {
                    self.rounds.add(round);
                }
                if let Some(resource) = self.resources.get_mut(&resource_id) {
                    resource.rounds_count = count;
                    resource.current_round = current;
                }
            }
            Action::AddRound(round) => {
                if let Some(resource) = self.resources.get_mut(&round.resource_id) {
                    resource.rounds_count += 1;
                    resource.current_round = Some(round.round_number);
                }
                self.rounds.add(round);
            }
            Action::UpdateRound(round) => {
                let previous_owner = self.rounds.get(&round.id).map(|r| r.resource_id.clone());
                let owner = round.resource_id.clone();
                if self.rounds.update(round) {
                    if let Some(from) = previous_owner.filter(|r| *r != owner) {
                        if let Some(resource) = self.resources.get_mut(&from) {
                            resource.rounds_count = resource.rounds_count.saturating_sub(1);
                        }
                        if let Some(resource) = self.resources.get_mut(&owner) {
                            resource.rounds_count += 1;
                        }
                        self.refresh_current_round(&from);
                    }
                    self.refresh_current_round(&owner);
                }
            }
            Action::DeleteRound(id) => {
                if let Some(round) = self.rounds.delete(&id) {
                    if let Some(resource) = self.resources.get_mut(&round.resource_id) {
                        resource.rounds_count = resource.rounds_count.saturating_sub(1);
                    }
                    self.refresh_current_round(&round.resource_id);
                }
            }

            Action::SetRoles(list) => self.roles.replace(list),
            Action::AddRole(role) => self.roles.add(role),
            Action::UpdateRole(role) => {
                let (id, name) = (role.id.clone(), role.name.clone());
                if self.roles.update(role) {
                    for job in self.jobs.iter_mut() {
                        if job.role_id == id {
                            job.role_name = name.clone();
                        }
                    }
                }
            }
            Action::DeleteRole(id) => {
                self.roles.delete(&id);
            }

            Action::SetUsers(list) => self.users.replace(list),
            Action::UpdateUser(user) => {
                self.users.update(user);
            }
            Action::GrantRoles { user_id, roles } => {
                if let Some(user) = self.users.get_mut(&user_id) {
                    for role in roles {
                        if !user.roles.contains(&role) {
                            user.roles.push(role);
                        }
                    }
                }
            }
        }
    }

    /// Moves a job and the resources under it from one client's counts to another's.
    fn move_job(&mut self, job_id: &str, from: &str, to: &str) {
        let resources = self.resources.iter().filter(|r| r.job_id == job_id).count() as u32;
        if let Some(client) = self.clients.get_mut(from) {
            client.jobs_count = client.jobs_count.saturating_sub(1);
            client.resources_count = client.resources_count.saturating_sub(resources);
        }
        if let Some(client) = self.clients.get_mut(to) {
            client.jobs_count += 1;
            client.resources_count += resources;
        }
    }

    /// The highest round number the store holds for a resource.
    fn refresh_current_round(&mut self, resource_id: &str) {
        let current = self
            .rounds
            .iter()
            .filter(|r| r.resource_id == resource_id)
            .map(|r| r.round_number)
            .max();
        if let Some(resource) = self.resources.get_mut(resource_id) {
            resource.current_round = current;
        }
    }

    fn rename_client(&mut self, client_id: &str, label: &str) {
        for job in self.jobs.iter_mut() {
            if job.client_id == client_id {
                job.client_name = label.to_string();
            }
        }
        for r in self.resources.iter_mut() {
            if r.client_id == client_id {
                r.client_name = label.to_string();
            }
        }
    }

    fn fill_job_names(&self, job: &mut Job) {
        if let Some(client) = self.clients.get(&job.client_id) {
            job.client_name = client.display_name().to_string();
        }
        if let Some(role) = self.roles.get(&job.role_id) {
            job.role_name = role.name.clone();
        }
    }

    fn fill_resource_names(&self, resource: &mut Resource) {
        if let Some(job) = self.jobs.get(&resource.job_id) {
            resource.job_title = job.title.clone();
            resource.client_id = job.client_id.clone();
            resource.client_name = job.client_name.clone();
        }
        if let Some(vendor_id) = resource.vendor_id.as_deref() {
            if let Some(vendor) = self.vendors.get(vendor_id) {
                resource.vendor_name = Some(vendor.display_name().to_string());
            }
        }
    }

    fn adjust_resource_counts(&mut self, resource: &Resource, added: bool) {
        let bump = |n: &mut u32| {
            if added {
                *n += 1;
            } else {
                *n = n.saturating_sub(1);
            }
        };
        if let Some(job) = self.jobs.get_mut(&resource.job_id) {
            bump(&mut job.resources_count);
        }
        if let Some(client) = self.clients.get_mut(&resource.client_id) {
            bump(&mut client.resources_count);
        }
        if let Some(vendor_id) = resource.vendor_id.as_deref() {
            if let Some(vendor) = self.vendors.get_mut(vendor_id) {
                bump(&mut vendor.resources_count);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::*;

    pub fn client(id: &str, company: &str, jobs_count: u32) -> Client {
        Client {
            id: id.to_string(),
            name: format!("Contact {id}"),
            email: format!("c{id}@example.com"),
            phone: "(555) 000-0000".to_string(),
            company: company.to_string(),
            industry: "Technology".to_string(),
            jobs_count,
            resources_count: 0,
            created_at: "2024-01-15".to_string(),
            contacts: vec![],
        }
    }

    pub fn vendor(id: &str, company: &str) -> Vendor {
        Vendor {
            id: id.to_string(),
            name: company.to_string(),
            email: format!("v{id}@example.com"),
            phone: String::new(),
            company: company.to_string(),
            industry: "Staffing".to_string(),
            resources_count: 0,
            created_at: "2024-01-10".to_string(),
            location: None,
            logo: None,
            contacts: vec![],
        }
    }

    pub fn job(id: &str, title: &str, client_id: &str) -> Job {
        Job {
            id: id.to_string(),
            title: title.to_string(),
            client_id: client_id.to_string(),
            client_name: String::new(),
            role_id: "1".to_string(),
            role_name: String::new(),
            description: "desc".to_string(),
            status: JobStatus::Open,
            resources_count: 0,
            created_at: "2024-01-15".to_string(),
            deadline: None,
            attachments: vec![],
        }
    }

    pub fn resource(id: &str, name: &str, job_id: &str, client_id: &str) -> Resource {
        Resource {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: String::new(),
            job_id: job_id.to_string(),
            job_title: String::new(),
            client_id: client_id.to_string(),
            client_name: String::new(),
            resource_type: ResourceType::Direct,
            vendor_id: None,
            vendor_name: None,
            interview_status: InterviewStatus::NotStarted,
            rounds_count: 0,
            current_round: None,
            experience: 3.0,
            skills: vec!["Rust".to_string()],
            resume: None,
            attachments: vec![],
            created_at: "2024-01-16".to_string(),
        }
    }

    pub fn round(id: &str, resource_id: &str, number: u32) -> InterviewRound {
        InterviewRound {
            id: id.to_string(),
            resource_id: resource_id.to_string(),
            round_number: number,
            round_type: "Technical".to_string(),
            interviewer: "John Smith".to_string(),
            date: "2024-01-20".to_string(),
            status: RoundStatus::Scheduled,
            feedback: None,
            attachments: vec![],
            created_at: "2024-01-19".to_string(),
        }
    }

    pub fn role(id: &str, name: &str) -> Role {
        Role {
            id: id.to_string(),
            name: name.to_string(),
            department: "Engineering".to_string(),
            level: RoleLevel::Senior,
            skills_required: vec!["Rust".to_string()],
            experience_min: 5,
            experience_max: 10,
            description: None,
            created_at: "2024-01-10".to_string(),
        }
    }

    pub fn user(id: &str, name: &str, roles: Vec<AccessRole>) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@company.com", name.to_lowercase()),
            roles,
            department: Some("HR".to_string()),
            created_at: "2024-01-01".to_string(),
        }
    }

    /// Two clients, one job each, one resource on the first job.
    pub fn seeded() -> super::Store {
        use super::Action;
        let mut store = super::Store::new();
        store.apply(Action::SetClients(vec![
            client("1", "TechCorp Inc", 0),
            client("2", "Innovate Solutions", 0),
        ]));
        store.apply(Action::SetRoles(vec![role("1", "Senior Developer")]));
        store.apply(Action::SetVendors(vec![vendor("1", "ABC Staffing")]));
        store.apply(Action::AddJob(job("10", "Senior React Developer", "1")));
        store.apply(Action::AddJob(job("20", "Project Manager", "2")));
        store.apply(Action::AddResource(resource("100", "Alice", "10", "1")));
        store
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::models::ResourceType;

    #[test]
    fn test_add_job_fills_names_and_counts() {
        let store = seeded();
        let job = store.jobs().get("10").unwrap();
        assert_eq!(job.client_name, "TechCorp Inc");
        assert_eq!(job.role_name, "Senior Developer");
        assert_eq!(store.clients().get("1").unwrap().jobs_count, 1);
        assert_eq!(store.jobs().get("10").unwrap().resources_count, 1);
        assert_eq!(store.clients().get("1").unwrap().resources_count, 1);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = seeded();
        store.apply(Action::UpdateClient(client("99", "Ghost", 0)));
        assert_eq!(store.clients().len(), 2);
        assert!(store.clients().get("99").is_none());
    }

    #[test]
    fn test_add_round_increments_count_and_current_round() {
        let mut store = seeded();
        let before = store.resources().get("100").unwrap().rounds_count;
        let number = store.next_round_number("100");
        store.apply(Action::AddRound(round("r1", "100", number)));

        let resource = store.resources().get("100").unwrap();
        assert_eq!(resource.rounds_count, before + 1);
        assert_eq!(resource.current_round, Some(number));
        assert_eq!(store.rounds_for("100").len() as u32, resource.rounds_count);
    }

    #[test]
    fn test_delete_round_decrements_and_recomputes_current() {
        let mut store = seeded();
        store.apply(Action::AddRound(round("r1", "100", 1)));
        store.apply(Action::AddRound(round("r2", "100", 2)));
        store.apply(Action::DeleteRound("r2".to_string()));

        let resource = store.resources().get("100").unwrap();
        assert_eq!(resource.rounds_count, 1);
        assert_eq!(resource.current_round, Some(1));
    }

    #[test]
    fn test_delete_unknown_round_leaves_count() {
        let mut store = seeded();
        store.apply(Action::AddRound(round("r1", "100", 1)));
        store.apply(Action::DeleteRound("missing".to_string()));
        assert_eq!(store.resources().get("100").unwrap().rounds_count, 1);
    }

    #[test]
    fn test_set_rounds_resyncs_count() {
        let mut store = seeded();
        store.apply(Action::AddRound(round("r1", "100", 1)));
        store.apply(Action::SetRounds {
            resource_id: "100".to_string(),
            rounds: vec![round("a", "100", 1), round("b", "100", 2), round("c", "100", 3)],
        });
        let resource = store.resources().get("100").unwrap();
        assert_eq!(resource.rounds_count, 3);
        assert_eq!(resource.current_round, Some(3));
        assert_eq!(store.next_round_number("100"), 4);
    }

    #[test]
    fn test_client_rename_propagates_to_jobs_and_resources() {
        let mut store = seeded();
        store.apply(Action::UpdateClient(client("1", "TechCorp Global", 1)));
        assert_eq!(store.jobs().get("10").unwrap().client_name, "TechCorp Global");
        assert_eq!(store.resources().get("100").unwrap().client_name, "TechCorp Global");
        assert_eq!(store.jobs().get("20").unwrap().client_name, "Innovate Solutions");
    }

    #[test]
    fn test_job_retitle_propagates_to_resources() {
        let mut store = seeded();
        let mut job = store.jobs().get("10").unwrap().clone();
        job.title = "Staff React Developer".to_string();
        store.apply(Action::UpdateJob(job));
        assert_eq!(store.resources().get("100").unwrap().job_title, "Staff React Developer");
    }

    #[test]
    fn test_role_rename_propagates_to_jobs() {
        let mut store = seeded();
        store.apply(Action::UpdateRole(role("1", "Principal Developer")));
        assert_eq!(store.jobs().get("10").unwrap().role_name, "Principal Developer");
    }

    #[test]
    fn test_delete_resource_drops_its_rounds() {
        let mut store = seeded();
        store.apply(Action::AddRound(round("r1", "100", 1)));
        store.apply(Action::DeleteResource("100".to_string()));
        assert!(store.rounds().is_empty());
        assert_eq!(store.jobs().get("10").unwrap().resources_count, 0);
    }

    #[test]
    fn test_resource_moved_to_another_job_moves_counts() {
        let mut store = seeded();
        let mut alice = store.resources().get("100").unwrap().clone();
        alice.job_id = "20".to_string();
        store.apply(Action::UpdateResource(alice));

        assert_eq!(store.jobs().get("10").unwrap().resources_count, 0);
        assert_eq!(store.jobs().get("20").unwrap().resources_count, 1);
        assert_eq!(store.clients().get("1").unwrap().resources_count, 0);
        assert_eq!(store.clients().get("2").unwrap().resources_count, 1);
        assert_eq!(store.resources().get("100").unwrap().client_id, "2");
    }

    #[test]
    fn test_resource_vendor_change_moves_vendor_count() {
        let mut store = seeded();
        let mut alice = store.resources().get("100").unwrap().clone();
        alice.resource_type = ResourceType::Vendor;
        alice.vendor_id = Some("1".to_string());
        store.apply(Action::UpdateResource(alice.clone()));
        assert_eq!(store.vendors().get("1").unwrap().resources_count, 1);
        assert_eq!(
            store.resources().get("100").unwrap().vendor_name.as_deref(),
            Some("ABC Staffing")
        );

        alice.resource_type = ResourceType::Direct;
        alice.vendor_id = None;
        store.apply(Action::UpdateResource(alice));
        assert_eq!(store.vendors().get("1").unwrap().resources_count, 0);
        // job and client are unchanged by a vendor switch
        assert_eq!(store.jobs().get("10").unwrap().resources_count, 1);
        assert_eq!(store.clients().get("1").unwrap().resources_count, 1);
    }

    #[test]
    fn test_job_moved_to_another_client_moves_counts() {
        let mut store = seeded();
        let mut job = store.jobs().get("10").unwrap().clone();
        job.client_id = "2".to_string();
        store.apply(Action::UpdateJob(job));

        let (one, two) = (store.clients().get("1").unwrap(), store.clients().get("2").unwrap());
        assert_eq!((one.jobs_count, two.jobs_count), (0, 2));
        assert_eq!((one.resources_count, two.resources_count), (0, 1));
        let alice = store.resources().get("100").unwrap();
        assert_eq!(alice.client_id, "2");
        assert_eq!(alice.client_name, "Innovate Solutions");
    }

    #[test]
    fn test_round_moved_to_another_resource_moves_counts() {
        let mut store = seeded();
        store.apply(Action::AddResource(resource("200", "Bob", "20", "2")));
        store.apply(Action::AddRound(round("r1", "100", 1)));
        store.apply(Action::AddRound(round("r2", "100", 2)));

        let mut moved = round("r2", "200", 1);
        moved.round_type = "Managerial".to_string();
        store.apply(Action::UpdateRound(moved));

        let alice = store.resources().get("100").unwrap();
        assert_eq!((alice.rounds_count, alice.current_round), (1, Some(1)));
        let bob = store.resources().get("200").unwrap();
        assert_eq!((bob.rounds_count, bob.current_round), (1, Some(1)));
        for id in ["100", "200"] {
            assert_eq!(
                store.resources().get(id).unwrap().rounds_count as usize,
                store.rounds_for(id).len()
            );
        }
    }

    #[test]
    fn test_renumbered_round_updates_current_round() {
        let mut store = seeded();
        store.apply(Action::AddRound(round("r1", "100", 1)));
        store.apply(Action::UpdateRound(round("r1", "100", 3)));
        let alice = store.resources().get("100").unwrap();
        assert_eq!((alice.rounds_count, alice.current_round), (1, Some(3)));
    }

    #[test]
    fn test_grant_roles_is_additive_without_duplicates() {
        let mut store = Store::new();
        store.apply(Action::SetUsers(vec![user("42", "Mike", vec![AccessRole::Recruiter])]));
        store.apply(Action::GrantRoles {
            user_id: "42".to_string(),
            roles: vec![AccessRole::Admin, AccessRole::Recruiter],
        });
        assert_eq!(
            store.users().get("42").unwrap().roles,
            vec![AccessRole::Recruiter, AccessRole::Admin]
        );
    }
}
